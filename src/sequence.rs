// (c) Roel Kluin, 2023, GPL v3

/// One input record. The identity is handed out by [`SequenceIds`] and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub id: u64,
    pub name: String,
    pub data: Vec<u8>,
    pub quality: Option<Vec<u8>>,
}

impl Sequence {
    pub fn new(id: u64, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Sequence {
            id,
            name: name.into(),
            data: data.into(),
            quality: None,
        }
    }
    pub fn with_quality(
        id: u64,
        name: impl Into<String>,
        data: impl Into<Vec<u8>>,
        quality: impl Into<Vec<u8>>,
    ) -> Self {
        Sequence {
            quality: Some(quality.into()),
            ..Sequence::new(id, name, data)
        }
    }
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Identity allocator, owned by whoever creates sequences.
#[derive(Debug, Default)]
pub struct SequenceIds {
    next: u64,
}

impl SequenceIds {
    pub fn new() -> Self {
        Self::default()
    }
    /// continue numbering after an earlier batch.
    pub fn starting_at(next: u64) -> Self {
        SequenceIds { next }
    }
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
    pub fn create(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Sequence {
        Sequence::new(self.next_id(), name, data)
    }
    pub fn create_with_quality(
        &mut self,
        name: impl Into<String>,
        data: impl Into<Vec<u8>>,
        quality: impl Into<Vec<u8>>,
    ) -> Sequence {
        Sequence::with_quality(self.next_id(), name, data, quality)
    }
    /// the number of identities handed out, if started at zero.
    pub fn peek(&self) -> u64 {
        self.next
    }
}
