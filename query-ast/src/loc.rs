/// A location within a source unit expressed as UTF-8 byte offsets.
///
/// Synthesized nodes (e.g. ones built by hand in a host) usually carry
/// `Loc(0, 0)`; consumers must treat an empty location as "unknown".
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Loc(pub usize, pub usize);

impl Loc {
  pub fn is_empty(&self) -> bool {
    self.0 >= self.1
  }

  pub fn len(&self) -> usize {
    self.1.saturating_sub(self.0)
  }

  /// Returns the source text covered by this location, if it lies on valid
  /// char boundaries of `text`.
  pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
    if self.is_empty() {
      return None;
    }
    text.get(self.0..self.1)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn slice_returns_covered_text() {
    let text = "orders.Where(o => o.Total)";
    assert_eq!(Loc(0, 6).slice(text), Some("orders"));
    assert_eq!(Loc(7, 12).slice(text), Some("Where"));
  }

  #[test]
  fn empty_or_out_of_range_slices_are_none() {
    let text = "abc";
    assert_eq!(Loc(0, 0).slice(text), None);
    assert_eq!(Loc(2, 10).slice(text), None);
  }
}
