//! Set difference over sample IDs.

/// Elements of `a` that are not in `b`, as a set.
///
/// Duplicates collapse. The result is sorted ascending, so identical inputs
/// always give identical output regardless of their order.
pub fn set_minus<T: Ord + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    let mut a: Vec<&T> = a.iter().collect();
    let mut b: Vec<&T> = b.iter().collect();
    a.sort_unstable();
    a.dedup();
    b.sort_unstable();
    b.dedup();

    let mut result = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(b[j]) {
            std::cmp::Ordering::Less => {
                result.push(a[i].clone());
                i += 1;
            }
            std::cmp::Ordering::Equal => {
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Greater => j += 1,
        }
    }
    result.extend(a[i..].iter().map(|x| (*x).clone()));
    result
}
