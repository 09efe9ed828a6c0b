//! Table-driven `TypeString::parse` permutations, the teacher's own pattern
//! for parametrized AST/parser tests.

use rstest::rstest;
use symcore::TypeString;

#[rstest]
#[case("int", vec!["int"])]
#[case("int|string", vec!["int", "string"])]
#[case("int|int", vec!["int"])]
#[case("", Vec::new())]
#[case("(A|B)[]|string", vec!["(A|B)[]", "string"])]
#[case(" int | string ", vec!["int", "string"])]
fn parse_produces_the_expected_duplicate_free_parts(#[case] input: &str, #[case] expected: Vec<&str>) {
    let parts: Vec<String> = TypeString::parse(input).parts().iter().map(|s| s.as_str().to_string()).collect();
    let expected: Vec<String> = expected.into_iter().map(str::to_string).collect();
    assert_eq!(parts, expected);
}
