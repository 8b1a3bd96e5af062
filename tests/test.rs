use jstream::options::ParserOptionsBuilder;
use jstream::{ErrorKind, Key, NumberParsing, Number, Parser, Token, Writer};

fn tokens_of(input: &[u8]) -> Result<Vec<Token>, jstream::ParserError> {
    let mut parser = Parser::from_slice(input);
    let mut out = Vec::new();
    while let Some(token) = parser.read()? {
        out.push(token);
    }
    Ok(out)
}

fn err_kind_of(input: &[u8]) -> ErrorKind {
    tokens_of(input).expect_err("expected a parse error").kind
}

// -- concrete scenarios (spec.md §8) -------------------------------------

#[test]
fn scenario_nested_empty_arrays() {
    let tokens = tokens_of(b"[[]]").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::StartArray(None),
            Token::StartArray(Some(Key::index(0))),
            Token::EndArray(Some(Key::index(0))),
            Token::EndArray(None),
        ]
    );
}

#[test]
fn scenario_nested_objects() {
    let tokens = tokens_of(br#"{"a":{"b":{"c":111}}}"#).unwrap();
    assert_eq!(tokens.len(), 7);
    assert_eq!(
        tokens[3],
        Token::Number(Some(Key::name("c")), Number::Int(111))
    );
    assert_eq!(tokens[4], Token::EndObject(Some(Key::name("b"))));
    assert_eq!(tokens[5], Token::EndObject(Some(Key::name("a"))));
    assert_eq!(tokens[6], Token::EndObject(None));
}

#[test]
fn scenario_string_escapes_and_dropped_carriage_return() {
    let input = "\"\\u20ac123 \\\"blah\\/\\\" (\\\\) \\r\\n\"".as_bytes();
    let tokens = tokens_of(input).unwrap();
    assert_eq!(
        tokens,
        vec![Token::String(None, "\u{20ac}123 \"blah/\" (\\) \n".to_owned())]
    );
}

#[test]
fn scenario_big_number_int_double_vs_all_decimal() {
    // 32 significant digits: far past both the 18-digit fast-int cutoff
    // and f64's ~17 significant digits of precision, so `intDouble` mode
    // can only approximate it while `allDecimal` mode must preserve it
    // exactly.
    let input = b"-12345678901234567890123456789.123";

    let tokens = tokens_of(input).unwrap();
    match &tokens[0] {
        Token::Number(None, Number::Double(d)) => {
            let expected = -12345678901234567890123456789.123_f64;
            assert!((d - expected).abs() / expected.abs() < 1e-9);
        }
        other => panic!("expected a double, got {other:?}"),
    }

    let options = ParserOptionsBuilder::default()
        .with_number_parsing(NumberParsing::AllDecimal)
        .build();
    let mut parser = Parser::from_slice_with_options(input, options);
    let token = parser.read().unwrap().unwrap();
    match token {
        Token::Number(None, Number::Decimal(d)) => {
            assert_eq!(d.to_string(), "-12345678901234567890123456789.123");
        }
        other => panic!("expected a decimal, got {other:?}"),
    }
}

#[test]
fn scenario_eighteen_digits_is_int_nineteen_is_double() {
    let tokens = tokens_of(b"999999999999999999").unwrap();
    assert_eq!(tokens, vec![Token::Number(None, Number::Int(999999999999999999))]);

    let tokens = tokens_of(b"1234567890123456789").unwrap();
    match &tokens[0] {
        Token::Number(None, Number::Double(d)) => {
            assert!((d - 1.2345678901234568e18).abs() < 1e6);
        }
        other => panic!("expected a double, got {other:?}"),
    }
}

#[test]
fn scenario_max_value_length_fails_before_closing_quote() {
    let options = ParserOptionsBuilder::default()
        .with_max_value_length(10)
        .build();
    let mut parser = Parser::from_slice_with_options("\"abcdefghij\u{20ac}\"".as_bytes(), options);
    assert_eq!(parser.read().unwrap_err().kind, ErrorKind::ValueTooLong);
}

// -- boundary behaviors ----------------------------------------------------

#[test]
fn bare_root_scalars_parse_to_a_single_token() {
    assert_eq!(tokens_of(b"\"x\"").unwrap(), vec![Token::String(None, "x".to_owned())]);
    assert_eq!(tokens_of(b"42").unwrap(), vec![Token::Number(None, Number::Int(42))]);
    assert_eq!(tokens_of(b"true").unwrap(), vec![Token::Bool(None, true)]);
    assert_eq!(tokens_of(b"false").unwrap(), vec![Token::Bool(None, false)]);
    assert_eq!(tokens_of(b"null").unwrap(), vec![Token::Null(None)]);
}

#[test]
fn empty_object_and_array_yield_exactly_two_tokens() {
    assert_eq!(
        tokens_of(b"{}").unwrap(),
        vec![Token::StartObject(None), Token::EndObject(None)]
    );
    assert_eq!(
        tokens_of(b"[]").unwrap(),
        vec![Token::StartArray(None), Token::EndArray(None)]
    );
}

#[test]
fn trailing_comma_fails() {
    assert_eq!(err_kind_of(b"[1,2,]"), ErrorKind::UnexpectedInput);
    assert_eq!(err_kind_of(br#"{"a":1,}"#), ErrorKind::UnexpectedInput);
}

#[test]
fn leading_comma_fails() {
    assert_eq!(err_kind_of(b"[,1]"), ErrorKind::UnexpectedInput);
}

#[test]
fn leading_zero_followed_by_digit_fails() {
    assert_eq!(err_kind_of(b"01"), ErrorKind::UnexpectedInput);
    assert_eq!(err_kind_of(b"[01]"), ErrorKind::UnexpectedInput);
}

#[test]
fn lone_minus_sign_fails_unexpected_input_not_eof() {
    assert_eq!(err_kind_of(b"-"), ErrorKind::UnexpectedInput);
    assert_eq!(err_kind_of(b"[-]"), ErrorKind::UnexpectedInput);
}

#[test]
fn plus_sign_rejected_on_integer_part_but_allowed_in_exponent() {
    assert_eq!(err_kind_of(b"+1"), ErrorKind::UnexpectedInput);
    assert_eq!(
        tokens_of(b"1e+2").unwrap(),
        vec![Token::Number(None, Number::Double(100.0))]
    );
}

#[test]
fn unescaped_nul_in_string_is_a_control_character_error_not_eof() {
    let input = b"\"a\x00b\"";
    assert_eq!(err_kind_of(input), ErrorKind::UnescapedControlCharacter);
}

#[test]
fn unterminated_constructs_fail_unexpected_eof() {
    assert_eq!(err_kind_of(b"\"abc"), ErrorKind::UnexpectedEof);
    assert_eq!(err_kind_of(b"{\"a\":1"), ErrorKind::UnexpectedEof);
    assert_eq!(err_kind_of(b"[1,2"), ErrorKind::UnexpectedEof);
}

#[test]
fn trailing_garbage_after_document_fails() {
    assert_eq!(err_kind_of(b"{} x"), ErrorKind::UnexpectedInput);
    assert_eq!(err_kind_of(b"1 2"), ErrorKind::UnexpectedInput);
}

#[test]
fn into_inner_reclaims_source_instead_of_leaking_it() {
    use std::io::Cursor;

    let options = ParserOptionsBuilder::default().with_close_on_drop(false).build();
    let mut parser =
        Parser::from_reader_with_options(Cursor::new(b"\"abc\" ".to_vec()), options);
    assert_eq!(parser.read().unwrap(), Some(Token::String(None, "abc".to_owned())));

    let cursor = parser.into_inner().into_inner();
    assert_eq!(cursor.into_inner(), b"\"abc\" ".to_vec());
}

#[test]
fn single_byte_buffer_yields_identical_token_stream() {
    let input = br#"{"a":[1,2.5,"x",true,false,null]}"#;
    let full = tokens_of(input).unwrap();

    let options = ParserOptionsBuilder::default().with_buffer_capacity(1).build();
    let mut parser = Parser::from_slice_with_options(input, options);
    let mut small = Vec::new();
    while let Some(token) = parser.read().unwrap() {
        small.push(token);
    }

    assert_eq!(full, small);
}

// -- path tracking -----------------------------------------------------

#[test]
fn path_tracks_nested_position_and_pops_on_close() {
    let mut parser = Parser::from_slice(br#"{"users":[{"name":"Elvis"}]}"#);
    let mut observed_at_name = None;
    while let Some(token) = parser.read().unwrap() {
        if matches!(&token, Token::String(Some(k), _) if k.as_name() == Some("name")) {
            observed_at_name = Some(parser.path_string());
        }
    }
    assert_eq!(observed_at_name.as_deref(), Some("users[0].name"));
}

#[test]
fn path_match_allows_gaps() {
    let mut parser = Parser::from_slice(br#"{"a":{"b":{"c":1}}}"#);
    let mut matched = false;
    while let Some(_) = parser.read().unwrap() {
        if parser.path_match(&[Key::name("a"), Key::name("c")]) {
            matched = true;
        }
    }
    assert!(matched);
}

// -- round trips ---------------------------------------------------------

#[test]
fn parse_then_write_then_reparse_round_trips() {
    let input = br#"{"a":1,"b":[true,false,null,"x",2.5],"c":{}}"#;
    let tokens = tokens_of(input).unwrap();

    let mut out = Vec::new();
    {
        let mut w = Writer::new(&mut out);
        let mut stack: Vec<bool> = Vec::new(); // true = array, false = object
        for token in &tokens {
            match token {
                Token::StartObject(key) => {
                    w.begin_object(key.as_ref().and_then(|k| k.as_name())).unwrap();
                    stack.push(false);
                }
                Token::StartArray(key) => {
                    w.begin_array(key.as_ref().and_then(|k| k.as_name())).unwrap();
                    stack.push(true);
                }
                Token::EndObject(_) => {
                    stack.pop();
                    w.end_object().unwrap();
                }
                Token::EndArray(_) => {
                    stack.pop();
                    w.end_array().unwrap();
                }
                Token::String(key, s) => {
                    w.write_string(key.as_ref().and_then(|k| k.as_name()), s).unwrap();
                }
                Token::Number(key, n) => {
                    w.write_number(key.as_ref().and_then(|k| k.as_name()), n).unwrap();
                }
                Token::Bool(key, b) => {
                    w.write_bool(key.as_ref().and_then(|k| k.as_name()), *b).unwrap();
                }
                Token::Null(key) => {
                    w.write_null(key.as_ref().and_then(|k| k.as_name())).unwrap();
                }
            }
        }
    }

    let reparsed = tokens_of(&out).unwrap();
    assert_eq!(tokens, reparsed);
}

#[cfg(feature = "serde_json")]
#[test]
fn serde_json_interop_round_trips_through_value() {
    let input = br#"{"name":"Elvis","hits":[1,2,3],"alive":false}"#;
    let value = jstream::serde_json::from_slice(input).unwrap();
    assert_eq!(value, serde_json::json!({"name":"Elvis","hits":[1,2,3],"alive":false}));
}
