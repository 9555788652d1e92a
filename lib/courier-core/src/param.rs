//! Parameter values and parameter sets.
//!
//! [`ToParam`] renders a field value into its wire string; [`ParameterSet`]
//! holds the resulting name/value pairs for one bucket.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::Serialize;

/// Conversion of a value into a header, query, path or form parameter.
///
/// Returns `None` when the value is absent and the parameter must be omitted
/// (e.g. `Option::None`, an empty `Vec`).
///
/// # Example
///
/// ```
/// use courier_core::ToParam;
///
/// assert_eq!(42_u32.to_param().as_deref(), Some("42"));
/// assert_eq!(true.to_param().as_deref(), Some("true"));
/// assert_eq!(None::<u32>.to_param(), None);
/// assert_eq!(vec!["a", "b"].to_param().as_deref(), Some("a,b"));
/// ```
pub trait ToParam {
    /// The wire representation, or `None` to omit the parameter.
    fn to_param(&self) -> Option<String>;
}

macro_rules! display_param {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToParam for $ty {
                fn to_param(&self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    };
}

display_param!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, str,
    String,
);

impl ToParam for Cow<'_, str> {
    fn to_param(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl<T: ToParam + ?Sized> ToParam for &T {
    fn to_param(&self) -> Option<String> {
        (**self).to_param()
    }
}

impl<T: ToParam + ?Sized> ToParam for Box<T> {
    fn to_param(&self) -> Option<String> {
        (**self).to_param()
    }
}

impl<T: ToParam> ToParam for Option<T> {
    fn to_param(&self) -> Option<String> {
        self.as_ref().and_then(ToParam::to_param)
    }
}

impl<T: ToParam> ToParam for [T] {
    fn to_param(&self) -> Option<String> {
        let values: Vec<_> = self.iter().filter_map(ToParam::to_param).collect();
        (!values.is_empty()).then(|| values.join(","))
    }
}

impl<T: ToParam> ToParam for Vec<T> {
    fn to_param(&self) -> Option<String> {
        self.as_slice().to_param()
    }
}

/// Name/value pairs of one parameter bucket.
///
/// Keys are unique; inserting an existing key replaces its value. Iteration
/// order is sorted by key so that encoded requests are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParameterSet(BTreeMap<String, String>);

impl ParameterSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    /// Insert a value, first removing any key equal to `name` ignoring ASCII case.
    ///
    /// Used for headers, whose names are case-insensitive on the wire.
    pub fn insert_ignore_ascii_case(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        let name = name.into();
        let previous = self.remove_ignore_ascii_case(&name);
        self.0.insert(name, value.into());
        previous
    }

    /// Remove every key equal to `name` ignoring ASCII case, returning the last value removed.
    pub fn remove_ignore_ascii_case(&mut self, name: &str) -> Option<String> {
        let mut removed = None;
        self.0.retain(|key, value| {
            if key.eq_ignore_ascii_case(name) {
                removed = Some(std::mem::take(value));
                false
            } else {
                true
            }
        });
        removed
    }

    /// Value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Value for `name`, ignoring ASCII case.
    #[must_use]
    pub fn get_ignore_ascii_case(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Whether `name` is present.
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Remove `name`, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Overlay `other` on top of this set; `other` wins on collisions.
    pub fn merge(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// Overlay `other` on top of this set, matching keys ignoring ASCII case.
    pub fn merge_ignore_ascii_case(&mut self, other: Self) {
        for (name, value) in other.0 {
            self.insert_ignore_ascii_case(name, value);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for ParameterSet {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.0.extend(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
    }
}

impl IntoIterator for ParameterSet {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_render_canonically() {
        assert_eq!(12_736_i64.to_param().as_deref(), Some("12736"));
        assert_eq!((-3_i8).to_param().as_deref(), Some("-3"));
        assert_eq!(false.to_param().as_deref(), Some("false"));
        assert_eq!("ho chi minh".to_param().as_deref(), Some("ho chi minh"));
        assert_eq!(String::from("x").to_param().as_deref(), Some("x"));
        assert_eq!('z'.to_param().as_deref(), Some("z"));
        assert_eq!(1.5_f64.to_param().as_deref(), Some("1.5"));
    }

    #[test]
    fn scalars_round_trip() {
        for value in [0_i64, 1, -1, i64::MAX, i64::MIN] {
            let rendered = value.to_param().expect("integers render");
            assert_eq!(rendered.parse::<i64>().expect("parse back"), value);
        }
        for value in [true, false] {
            let rendered = value.to_param().expect("booleans render");
            assert_eq!(rendered.parse::<bool>().expect("parse back"), value);
        }
        let text = "a,b c";
        assert_eq!(text.to_param().as_deref(), Some(text));
    }

    #[test]
    fn absent_values_are_omitted() {
        assert_eq!(None::<String>.to_param(), None);
        assert_eq!(Some(7_u8).to_param().as_deref(), Some("7"));
        assert_eq!(Vec::<u32>::new().to_param(), None);
        assert_eq!(vec![None::<u32>, None].to_param(), None);
    }

    #[test]
    fn sequences_are_comma_joined() {
        assert_eq!(vec![1, 2, 3].to_param().as_deref(), Some("1,2,3"));
        assert_eq!(vec![Some("a"), None, Some("c")].to_param().as_deref(), Some("a,c"));
    }

    #[test]
    fn references_and_boxes_delegate() {
        let value = 5_u16;
        assert_eq!((&&value).to_param().as_deref(), Some("5"));
        assert_eq!(Box::new("boxed").to_param().as_deref(), Some("boxed"));
        assert_eq!(Cow::Borrowed("cow").to_param().as_deref(), Some("cow"));
    }

    #[test]
    fn set_last_write_wins() {
        let mut set = ParameterSet::new();
        assert_eq!(set.insert("page", "1"), None);
        assert_eq!(set.insert("page", "2").as_deref(), Some("1"));
        assert_eq!(set.get("page"), Some("2"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn set_iterates_in_key_order() {
        let set: ParameterSet = [("b", "2"), ("a", "1"), ("c", "3")].into_iter().collect();
        let keys: Vec<_> = set.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, ["a", "b", "c"]);
    }

    #[test]
    fn set_case_insensitive_insert_replaces_variants() {
        let mut set = ParameterSet::new();
        set.insert("authorization", "Basic old");
        set.insert_ignore_ascii_case("Authorization", "Bearer new");

        assert_eq!(set.len(), 1);
        assert_eq!(set.get("Authorization"), Some("Bearer new"));
        assert_eq!(set.get_ignore_ascii_case("AUTHORIZATION"), Some("Bearer new"));
    }

    #[test]
    fn set_merge_overlays() {
        let mut base: ParameterSet = [("a", "1"), ("b", "1")].into_iter().collect();
        base.merge([("b", "2"), ("c", "2")].into_iter().collect());

        assert_eq!(base.get("a"), Some("1"));
        assert_eq!(base.get("b"), Some("2"));
        assert_eq!(base.get("c"), Some("2"));
    }

    #[test]
    fn set_serializes_as_map() {
        let set: ParameterSet = [("name", "Alice"), ("city", "Ha Noi")].into_iter().collect();
        let encoded = serde_html_form::to_string(&set).expect("serialize");
        assert_eq!(encoded, "city=Ha+Noi&name=Alice");
    }
}
