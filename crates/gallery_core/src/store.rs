use crate::Record;

/// Fetched records plus the fetch status shown by list and detail views.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    selected: Option<Record>,
    loading: bool,
    error: Option<String>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn selected(&self) -> Option<&Record> {
        self.selected.as_ref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// The closed set of store mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreAction {
    SetLoading(bool),
    SetRecords(Vec<Record>),
    SetSelectedRecord(Option<Record>),
    SetError(Option<String>),
    Reset,
}

/// Applies one action to the store.
///
/// Starting a load clears the previous error, replacing the records clears
/// both loading and error, and recording an error clears loading.
pub fn reduce_store(state: RecordStore, action: StoreAction) -> RecordStore {
    match action {
        StoreAction::SetLoading(true) => RecordStore {
            loading: true,
            error: None,
            ..state
        },
        StoreAction::SetLoading(false) => RecordStore {
            loading: false,
            ..state
        },
        StoreAction::SetRecords(records) => RecordStore {
            records,
            loading: false,
            error: None,
            ..state
        },
        StoreAction::SetSelectedRecord(selected) => RecordStore { selected, ..state },
        StoreAction::SetError(error) => RecordStore {
            error,
            loading: false,
            ..state
        },
        StoreAction::Reset => RecordStore::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Fields;

    fn record(id: &str) -> Record {
        Record::new(id, Fields::new(), "2024-01-15T10:30:00.000Z")
    }

    #[test]
    fn loading_clears_previous_error() {
        let state = reduce_store(
            RecordStore::new(),
            StoreAction::SetError(Some("boom".into())),
        );
        let state = reduce_store(state, StoreAction::SetLoading(true));
        assert!(state.loading());
        assert_eq!(state.error(), None);
    }

    #[test]
    fn records_replace_wholesale_and_settle() {
        let state = reduce_store(RecordStore::new(), StoreAction::SetRecords(vec![record("a")]));
        let state = reduce_store(state, StoreAction::SetLoading(true));
        let state = reduce_store(
            state,
            StoreAction::SetRecords(vec![record("c"), record("b")]),
        );
        let ids: Vec<_> = state.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b"]);
        assert!(!state.loading());
        assert_eq!(state.error(), None);
    }

    #[test]
    fn error_keeps_records_and_selection() {
        let state = reduce_store(RecordStore::new(), StoreAction::SetRecords(vec![record("a")]));
        let state = reduce_store(state, StoreAction::SetSelectedRecord(Some(record("a"))));
        let state = reduce_store(state, StoreAction::SetLoading(true));
        let state = reduce_store(state, StoreAction::SetError(Some("down".into())));
        assert_eq!(state.records().len(), 1);
        assert_eq!(state.selected().map(|r| r.id.as_str()), Some("a"));
        assert!(!state.loading());
        assert_eq!(state.error(), Some("down"));
    }

    #[test]
    fn reset_returns_to_initial() {
        let state = reduce_store(RecordStore::new(), StoreAction::SetRecords(vec![record("a")]));
        let state = reduce_store(state, StoreAction::SetError(Some("x".into())));
        assert_eq!(reduce_store(state, StoreAction::Reset), RecordStore::default());
    }
}
