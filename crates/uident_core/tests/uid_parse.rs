use uident_core::{parse, serialize, ParseError, Uid};

#[test]
fn parse_full_doc_reference() {
    let uid = parse("@servokiss:aiagents:class:UserAgent:method:updateProfile:doc").unwrap();

    assert_eq!(uid.owner, "servokiss");
    assert_eq!(uid.module, "aiagents");
    assert_eq!(uid.tier1, "class");
    assert_eq!(uid.name, "UserAgent");
    assert_eq!(uid.tier2, vec!["method", "updateProfile"]);
    assert!(uid.doc_ref);
    assert!(uid.type_ref.is_none());
}

#[test]
fn parse_defined_type_without_doc() {
    let uid = parse("@servokiss:aiagents:definedtypes:UserProfileUpdate:jsenviro:object").unwrap();

    assert_eq!(uid.tier2, vec!["jsenviro", "object"]);
    assert!(!uid.doc_ref);
}

#[test]
fn parse_minimal_four_segments() {
    let uid = parse("@servokiss:aiagents:class:UserAgent").unwrap();

    assert_eq!(uid.owner, "servokiss");
    assert_eq!(uid.name, "UserAgent");
    assert!(uid.tier2.is_empty());
    assert!(!uid.doc_ref);
}

#[test]
fn parse_keeps_indexed_segment_whole() {
    let uid = parse("@servokiss:aiagents:class:UserAgent:params[0]").unwrap();

    assert_eq!(uid.tier2, vec!["params[0]"]);
}

#[test]
fn parse_nested_type_reference() {
    let raw = "@servokiss:aiagents:class:UserAgent:params[0]:@servokiss:aiagents:definedtypes:UserProfileUpdate";
    let uid = parse(raw).unwrap();

    assert_eq!(uid.tier2, vec!["params[0]"]);
    let type_ref = uid.type_ref.as_deref().unwrap();
    assert_eq!(type_ref.owner, "servokiss");
    assert_eq!(type_ref.tier1, "definedtypes");
    assert_eq!(type_ref.name, "UserProfileUpdate");
    assert!(type_ref.type_ref.is_none());
}

#[test]
fn trailing_doc_binds_to_outermost_uid() {
    let raw = "@a:b:class:C:field:@x:y:definedtypes:T:doc";
    let uid = parse(raw).unwrap();

    assert!(uid.doc_ref);
    let type_ref = uid.type_ref.as_deref().unwrap();
    assert!(!type_ref.doc_ref);
    assert_eq!(type_ref.name, "T");
}

#[test]
fn fourth_segment_named_doc_is_a_name_not_a_marker() {
    let uid = parse("@a:b:class:doc").unwrap();

    assert_eq!(uid.name, "doc");
    assert!(!uid.doc_ref);
}

#[test]
fn fifth_segment_doc_is_a_marker() {
    let uid = parse("@a:b:class:doc:doc").unwrap();

    assert_eq!(uid.name, "doc");
    assert!(uid.doc_ref);
    assert!(uid.tier2.is_empty());
}

#[test]
fn missing_owner_prefix_is_rejected() {
    let err = parse("servokiss:aiagents:class:UserAgent").unwrap_err();
    assert!(matches!(err, ParseError::MissingOwnerPrefix { .. }));
}

#[test]
fn trailing_empty_segment_is_rejected() {
    let err = parse("@a:b:class:").unwrap_err();
    assert_eq!(
        err,
        ParseError::EmptySegment {
            raw: "@a:b:class:".to_string(),
            position: 3,
        }
    );
}

#[test]
fn consecutive_separators_are_rejected() {
    let err = parse("@a::class:Name").unwrap_err();
    assert_eq!(
        err,
        ParseError::EmptySegment {
            raw: "@a::class:Name".to_string(),
            position: 1,
        }
    );
}

#[test]
fn bare_owner_prefix_is_rejected() {
    let err = parse("@:b:class:Name").unwrap_err();
    assert!(matches!(err, ParseError::EmptySegment { position: 0, .. }));
}

#[test]
fn too_few_segments_are_rejected() {
    let err = parse("@servokiss:aiagents:class").unwrap_err();
    assert!(matches!(err, ParseError::MalformedUid { .. }));

    let err = parse("").unwrap_err();
    assert!(matches!(err, ParseError::MalformedUid { .. }));
}

#[test]
fn malformed_brackets_are_rejected() {
    for raw in [
        "@a:b:class:Name:params[0",
        "@a:b:class:Name:params[x]",
        "@a:b:class:Name:map[k:v]",
    ] {
        let err = parse(raw).unwrap_err();
        assert!(matches!(err, ParseError::MalformedUid { .. }), "raw: {raw}");
    }
}

#[test]
fn mid_segment_owner_prefix_is_rejected() {
    let err = parse("@a:b:class:user@host").unwrap_err();
    assert!(matches!(err, ParseError::MalformedUid { .. }));
}

#[test]
fn incomplete_nested_reference_fails_the_parse() {
    // `@` is reserved: a tail ref must itself be a full UID.
    let err = parse("@a:b:class:Name:@x:y").unwrap_err();
    assert!(matches!(err, ParseError::MalformedUid { .. }));
}

#[test]
fn canonical_strings_round_trip() {
    for raw in [
        "@servokiss:aiagents:class:UserAgent",
        "@servokiss:aiagents:class:UserAgent:method:updateProfile:doc",
        "@servokiss:aiagents:definedtypes:UserProfileUpdate:jsenviro:object",
        "@servokiss:aiagents:class:UserAgent:params[0]:@servokiss:aiagents:definedtypes:UserProfileUpdate",
        "@a:b:class:C:field:@x:y:definedtypes:T:doc",
        "@a:b:class:doc:doc",
    ] {
        let uid = parse(raw).unwrap();
        assert_eq!(serialize(&uid), raw, "round trip failed for {raw}");
        assert_eq!(parse(&serialize(&uid)).unwrap(), uid);
    }
}

#[test]
fn unknown_tier1_values_still_parse() {
    // The tier1 set is open; membership is a validation concern.
    let uid = parse("@servokiss:aiagents:widget:Sidebar").unwrap();
    assert_eq!(uid.tier1, "widget");
}

#[test]
fn parse_matches_from_str() {
    let raw = "@servokiss:aiagents:class:UserAgent:doc";
    let parsed: Uid = raw.parse().unwrap();
    assert_eq!(parsed, parse(raw).unwrap());
    assert_eq!(parsed.to_string(), raw);
}
