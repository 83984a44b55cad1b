use hyper::header::{HeaderName, HeaderValue};
use hyper::HeaderMap;

/// 헤더 존재 여부 판단 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckMode {
    /// 헤더 키가 아예 없을 때만 추가
    #[default]
    Strict,
    /// 헤더 키가 없거나 첫 값이 빈 문자열이면 추가
    Loose,
}

impl CheckMode {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            Self::Strict
        } else {
            Self::Loose
        }
    }
}

/// 설정된 값을 기록해야 하는지 판단합니다.
pub fn should_inject(headers: &HeaderMap, key: &HeaderName, mode: CheckMode) -> bool {
    match mode {
        CheckMode::Strict => !headers.contains_key(key),
        CheckMode::Loose => headers.get(key).map_or(true, |value| value.is_empty()),
    }
}

/// 빠진 헤더를 채워 넣습니다.
///
/// 추가가 아니라 설정(set)이므로 기존의 여러 값은 하나의 값으로 대체됩니다.
pub fn augment(headers: &mut HeaderMap, configured: &[(HeaderName, HeaderValue)], mode: CheckMode) {
    for (name, value) in configured {
        if should_inject(headers, name, mode) {
            headers.insert(name.clone(), value.clone());
        }
    }
}

/// 우회 조건
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BypassCondition {
    /// 값과 무관하게 헤더가 존재하면 일치
    Present,
    /// 첫 값이 정확히 같으면 일치 (대소문자 구분)
    Equals(HeaderValue),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BypassRule {
    pub name: HeaderName,
    pub condition: BypassCondition,
}

impl BypassRule {
    /// 빈 값은 존재 여부만 확인하는 규칙이 됩니다.
    pub fn new(name: HeaderName, expected: HeaderValue) -> Self {
        let condition = if expected.is_empty() {
            BypassCondition::Present
        } else {
            BypassCondition::Equals(expected)
        };
        Self { name, condition }
    }

    pub fn matches(&self, headers: &HeaderMap) -> bool {
        match &self.condition {
            BypassCondition::Present => headers.contains_key(&self.name),
            BypassCondition::Equals(expected) => headers.get(&self.name) == Some(expected),
        }
    }
}

/// 하나라도 일치하는 규칙이 있으면 우회합니다.
pub fn should_bypass(headers: &HeaderMap, rules: &[BypassRule]) -> bool {
    rules.iter().any(|rule| rule.matches(headers))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &'static str) -> HeaderName {
        HeaderName::from_static(s)
    }

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.append(name(k), HeaderValue::from_static(v));
        }
        map
    }

    #[test]
    fn test_missing_header_is_injected_in_both_modes() {
        let map = headers(&[("x-other", "1")]);
        assert!(should_inject(&map, &name("x-a"), CheckMode::Strict));
        assert!(should_inject(&map, &name("x-a"), CheckMode::Loose));
    }

    #[test]
    fn test_empty_header_depends_on_mode() {
        let map = headers(&[("x-a", "")]);
        assert!(!should_inject(&map, &name("x-a"), CheckMode::Strict));
        assert!(should_inject(&map, &name("x-a"), CheckMode::Loose));
    }

    #[test]
    fn test_non_empty_header_is_never_injected() {
        let map = headers(&[("x-a", "v")]);
        assert!(!should_inject(&map, &name("x-a"), CheckMode::Strict));
        assert!(!should_inject(&map, &name("x-a"), CheckMode::Loose));
    }

    #[test]
    fn test_loose_mode_looks_at_first_value_only() {
        let map = headers(&[("x-a", "v"), ("x-a", "")]);
        assert!(!should_inject(&map, &name("x-a"), CheckMode::Loose));

        let map = headers(&[("x-a", ""), ("x-a", "v")]);
        assert!(should_inject(&map, &name("x-a"), CheckMode::Loose));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_bytes(b"X-Custom").unwrap(),
            HeaderValue::from_static("v"),
        );
        let key = HeaderName::from_bytes(b"x-CUSTOM").unwrap();
        assert!(!should_inject(&map, &key, CheckMode::Strict));
    }

    #[test]
    fn test_augment_replaces_multi_value_entry() {
        let mut map = headers(&[("x-a", ""), ("x-a", "second")]);
        let configured = vec![(name("x-a"), HeaderValue::from_static("filled"))];

        augment(&mut map, &configured, CheckMode::Loose);

        let values: Vec<_> = map.get_all("x-a").iter().collect();
        assert_eq!(values, vec![&HeaderValue::from_static("filled")]);
    }

    #[test]
    fn test_augment_is_idempotent() {
        let configured = vec![
            (name("x-a"), HeaderValue::from_static("1")),
            (name("x-b"), HeaderValue::from_static("2")),
        ];

        for mode in [CheckMode::Strict, CheckMode::Loose] {
            let mut once = headers(&[("x-a", ""), ("x-c", "3")]);
            augment(&mut once, &configured, mode);

            let mut twice = once.clone();
            augment(&mut twice, &configured, mode);

            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_bypass_presence_matches_any_value() {
        let rules = vec![BypassRule::new(name("x-skip"), HeaderValue::from_static(""))];

        assert!(should_bypass(&headers(&[("x-skip", "")]), &rules));
        assert!(should_bypass(&headers(&[("x-skip", "anything")]), &rules));
        assert!(!should_bypass(&headers(&[("x-other", "1")]), &rules));
    }

    #[test]
    fn test_bypass_value_is_exact_and_case_sensitive() {
        let rules = vec![BypassRule::new(name("x-skip"), HeaderValue::from_static("true"))];

        assert!(should_bypass(&headers(&[("x-skip", "true")]), &rules));
        assert!(!should_bypass(&headers(&[("x-skip", "TRUE")]), &rules));
        assert!(!should_bypass(&headers(&[("x-skip", "")]), &rules));
        assert!(!should_bypass(&HeaderMap::new(), &rules));
    }

    #[test]
    fn test_bypass_without_rules() {
        assert!(!should_bypass(&headers(&[("x-skip", "true")]), &[]));
    }

    #[test]
    fn test_bypass_result_independent_of_rule_order() {
        let presence = BypassRule::new(name("x-accel-buffering"), HeaderValue::from_static(""));
        let value = BypassRule::new(name("x-skip-processing"), HeaderValue::from_static("true"));
        let forward = vec![presence.clone(), value.clone()];
        let reverse = vec![value, presence];

        let cases = [
            headers(&[("x-accel-buffering", "no")]),
            headers(&[("x-skip-processing", "true")]),
            headers(&[("x-skip-processing", "false")]),
            headers(&[("x-accel-buffering", "no"), ("x-skip-processing", "true")]),
            HeaderMap::new(),
        ];

        for case in &cases {
            assert_eq!(should_bypass(case, &forward), should_bypass(case, &reverse));
        }
    }
}
