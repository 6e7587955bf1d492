use rebyte::{Match, Regex};

/// Test that \p pattern fails to parse.
#[track_caller]
pub fn test_parse_fails(pattern: &str) {
    let res = Regex::new(pattern);
    assert!(res.is_err(), "Pattern should not have parsed: {}", pattern);
}

/// Format a Match by inserting commas between the whole match and all
/// capture groups.
fn format_match(m: &Match, input: &str) -> String {
    let mut result = input[m.range()].to_string();
    for cg in m.groups() {
        result.push(',');
        if let Some(cg) = cg {
            result.push_str(std::str::from_utf8(cg.bytes).expect("test inputs are utf-8"));
        }
    }
    result
}

pub trait StringTestHelpers {
    /// "Fluent" style helper for testing that a String is equal to a str.
    fn test_eq(&self, s: &str);
}

impl StringTestHelpers for String {
    fn test_eq(&self, rhs: &str) {
        assert_eq!(self.as_str(), rhs)
    }
}

pub trait VecTestHelpers {
    /// "Fluent" style helper for testing that a Vec<String> is equal to a
    /// Vec<&str>.
    fn test_eq(&self, rhs: Vec<&str>);
}

impl VecTestHelpers for Vec<String> {
    fn test_eq(&self, rhs: Vec<&str>) {
        let lhs: Vec<&str> = self.iter().map(String::as_str).collect();
        assert_eq!(lhs, rhs)
    }
}

/// A compiled regex with fluent test helpers.
pub struct TestCompiledRegex {
    re: Regex,
}

impl TestCompiledRegex {
    /// Search for self in \p input, returning the first match, or None.
    pub fn find<'t>(&self, input: &'t str) -> Option<Match<'t>> {
        self.re.find(input.as_bytes())
    }

    /// Match against \p input, returning the first formatted match.
    #[track_caller]
    pub fn match1f(&self, input: &str) -> String {
        match self.find(input) {
            Some(m) => format_match(&m, input),
            None => panic!("Failed to match {}", input),
        }
    }

    /// Collect the text of all non-overlapping matches in \p input.
    pub fn match_all(&self, input: &str) -> Vec<String> {
        self.re
            .find_iter(input.as_bytes())
            .map(|m| input[m.range()].to_string())
            .collect()
    }

    #[track_caller]
    pub fn test_fails(&self, input: &str) {
        assert!(
            self.find(input).is_none(),
            "Should not have matched {}",
            input
        );
    }
}

#[track_caller]
pub fn compile(pattern: &str) -> TestCompiledRegex {
    match Regex::new(pattern) {
        Ok(re) => TestCompiledRegex { re },
        Err(err) => panic!("Pattern {} failed to compile: {}", pattern, err),
    }
}
