/// Returns the longest prefix of `labels` that matches `segments` element by element
///
/// The result is empty when `labels` is empty or the first elements already differ. Matching stops as soon as
/// either side runs out.
pub fn longest_matching_labels<'l, L, S>(labels: &'l [L], segments: &[S]) -> &'l [L]
where
    L: AsRef<str>,
    S: AsRef<str>,
{
    let matched = labels
        .iter()
        .zip(segments)
        .take_while(|(label, segment)| label.as_ref() == segment.as_ref())
        .count();

    &labels[..matched]
}
