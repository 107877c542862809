//! Alignment of auxiliary sequences onto the recipient list.
//!
//! Fewer subjects or messages than recipients is not an error. The deficit is
//! padded with the last supplied value, and only when nothing at all was
//! supplied does the single global fallback apply.

/// Produce exactly one value per recipient.
///
/// For index `i`: `values[i]` if present, else the last value, else
/// `fallback`.
pub fn align<R, V: Clone>(recipients: &[R], values: &[V], fallback: V) -> Vec<V> {
    (0..recipients.len())
        .map(|i| match values.get(i).or_else(|| values.last()) {
            Some(value) => value.clone(),
            None => fallback.clone(),
        })
        .collect()
}

/// Align the personalized body slots onto the recipients.
///
/// A missing or empty slot falls back to the first slot. Whitespace-only
/// slots are kept as they are so the caller can reject them as blank.
pub fn align_slots<R>(recipients: &[R], slots: &[String]) -> Vec<String> {
    let first = slots.first().map(String::as_str).unwrap_or("");

    (0..recipients.len())
        .map(|i| match slots.get(i) {
            Some(slot) if !slot.is_empty() => slot.clone(),
            _ => first.to_string(),
        })
        .collect()
}

/// Resize an editable slot list to the recipient count.
///
/// Existing slots keep their position; new slots start empty.
pub fn sync_slots(recipient_count: usize, slots: &[String]) -> Vec<String> {
    (0..recipient_count)
        .map(|i| slots.get(i).cloned().unwrap_or_default())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_align_positional() {
        let recipients = ["a", "b", "c"];
        let subjects = strings(&["one", "two", "three"]);

        let result = align(&recipients, &subjects, "fallback".to_string());
        assert_eq!(result, strings(&["one", "two", "three"]));
    }

    #[test]
    fn test_align_repeats_last_value() {
        for n in 1..6 {
            for m in 1..=n {
                let recipients: Vec<usize> = (0..n).collect();
                let values: Vec<String> = (0..m).map(|i| format!("s{}", i)).collect();

                let result = align(&recipients, &values, "fallback".to_string());

                assert_eq!(result.len(), n);
                assert_eq!(&result[..m], &values[..]);
                assert!(result[m..].iter().all(|v| *v == values[m - 1]));
            }
        }
    }

    #[test]
    fn test_align_empty_values_uses_fallback() {
        let recipients = ["a", "b"];
        let result = align(&recipients, &Vec::<String>::new(), "Hello".to_string());
        assert_eq!(result, strings(&["Hello", "Hello"]));
    }

    #[test]
    fn test_align_no_recipients() {
        let recipients: [&str; 0] = [];
        let result = align(&recipients, &strings(&["x"]), "y".to_string());
        assert!(result.is_empty());
    }

    #[test]
    fn test_align_extra_values_ignored() {
        let recipients = ["a"];
        let result = align(&recipients, &strings(&["one", "two"]), String::new());
        assert_eq!(result, strings(&["one"]));
    }

    #[test]
    fn test_align_slots_falls_back_to_first() {
        let recipients = ["a", "b", "c"];
        let slots = strings(&["Body A", ""]);

        let result = align_slots(&recipients, &slots);
        assert_eq!(result, strings(&["Body A", "Body A", "Body A"]));
    }

    #[test]
    fn test_align_slots_keeps_whitespace_slot() {
        let recipients = ["a", "b"];
        let slots = strings(&["Body A", "   "]);

        let result = align_slots(&recipients, &slots);
        assert_eq!(result, strings(&["Body A", "   "]));
    }

    #[test]
    fn test_align_slots_blank_first() {
        let recipients = ["a", "b", "c"];
        let slots = strings(&["", "Body B"]);

        let result = align_slots(&recipients, &slots);
        assert_eq!(result, strings(&["", "Body B", ""]));
    }

    #[test]
    fn test_sync_slots() {
        let slots = strings(&["one", "two"]);

        assert_eq!(sync_slots(3, &slots), strings(&["one", "two", ""]));
        assert_eq!(sync_slots(1, &slots), strings(&["one"]));
        assert!(sync_slots(0, &slots).is_empty());
    }
}
