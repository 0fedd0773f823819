use crate::render::SourceProvider;
use crate::FileId;
use std::sync::Arc;

/// In-memory file names and texts for rendering diagnostics in tests and the
/// CLI. Ids are allocated in insertion order starting from zero.
#[derive(Clone, Debug, Default)]
pub struct SimpleFiles {
  files: Vec<(Arc<str>, Option<Arc<str>>)>,
}

impl SimpleFiles {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&mut self, name: impl Into<Arc<str>>, text: impl Into<Arc<str>>) -> FileId {
    self.push(name.into(), Some(text.into()))
  }

  /// Registers a unit whose source text is not available; diagnostics for it
  /// still render with their file name.
  pub fn add_without_text(&mut self, name: impl Into<Arc<str>>) -> FileId {
    self.push(name.into(), None)
  }

  fn push(&mut self, name: Arc<str>, text: Option<Arc<str>>) -> FileId {
    let file = FileId(u32::try_from(self.files.len()).unwrap_or(u32::MAX));
    self.files.push((name, text));
    file
  }
}

impl SourceProvider for SimpleFiles {
  fn file_name(&self, file: FileId) -> Option<&str> {
    self.files.get(file.0 as usize).map(|(name, _)| name.as_ref())
  }

  fn file_text(&self, file: FileId) -> Option<&str> {
    self
      .files
      .get(file.0 as usize)
      .and_then(|(_, text)| text.as_deref())
  }
}
