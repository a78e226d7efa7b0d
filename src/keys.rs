/// Return the keys of a map in ascending order.
///
/// Strings sort lexicographically, integers numerically. Works with any map
/// that iterates as `(&K, V)` pairs, so both `HashMap` and `BTreeMap`
/// references are accepted.
pub fn ordered_keys<'a, K, V, I>(map: I) -> Vec<&'a K>
where
    K: Ord + 'a,
    I: IntoIterator<Item = (&'a K, V)>,
{
    let mut keys: Vec<&K> = map.into_iter().map(|(key, _)| key).collect();
    keys.sort_unstable();
    keys
}
