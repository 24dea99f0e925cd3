/// Picks the index of the config whose sample count best matches `requested`.
///
/// An exact match wins; otherwise the largest count not exceeding the request;
/// otherwise the smallest count available. Ties keep the earliest entry, which
/// preserves the platform's own ordering.
pub(crate) fn choose_sample_count(available: &[u8], requested: u8) -> Option<usize> {
    if available.is_empty() {
        return None;
    }

    if let Some(i) = available.iter().position(|&n| n == requested) {
        return Some(i);
    }

    let below = available
        .iter()
        .enumerate()
        .filter(|&(_, &n)| n < requested)
        .fold(None, |best: Option<(usize, u8)>, (i, &n)| match best {
            Some((_, b)) if b >= n => best,
            _ => Some((i, n)),
        });

    if let Some((i, _)) = below {
        return Some(i);
    }

    available
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, u8)>, (i, &n)| match best {
            Some((_, b)) if b <= n => best,
            _ => Some((i, n)),
        })
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_no_choice() {
        assert_eq!(choose_sample_count(&[], 2), None);
    }

    #[test]
    fn exact_match_wins() {
        assert_eq!(choose_sample_count(&[0, 4, 2, 8], 2), Some(2));
    }

    #[test]
    fn falls_back_to_largest_below() {
        assert_eq!(choose_sample_count(&[0, 1, 8], 4), Some(1));
    }

    #[test]
    fn falls_back_to_smallest_above() {
        assert_eq!(choose_sample_count(&[16, 8], 2), Some(1));
    }

    #[test]
    fn zero_request_prefers_no_msaa() {
        assert_eq!(choose_sample_count(&[4, 0, 2], 0), Some(1));
    }

    #[test]
    fn ties_keep_first() {
        assert_eq!(choose_sample_count(&[0, 2, 2], 2), Some(1));
        assert_eq!(choose_sample_count(&[1, 1], 4), Some(0));
    }
}
