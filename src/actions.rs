use super::*;

/// The modal dialogs the page wires up, addressed by their rendered ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogId {
    DelAcc,
    DeleteSel,
    ImportOauth,
    ImportForm,
    ExportChoice,
    Download,
    ExportOauth,
    ExportForm,
}

impl DialogId {
    pub const ALL: [DialogId; 8] = [
        DialogId::DelAcc,
        DialogId::DeleteSel,
        DialogId::ImportOauth,
        DialogId::ImportForm,
        DialogId::ExportChoice,
        DialogId::Download,
        DialogId::ExportOauth,
        DialogId::ExportForm,
    ];

    pub fn selector(self) -> &'static str {
        match self {
            Self::DelAcc => "#del-acc-dialog",
            Self::DeleteSel => "#delete-sel-dialog",
            Self::ImportOauth => "#import-oauth-dialog",
            Self::ImportForm => "#import-form-dialog",
            Self::ExportChoice => "#export-choice-dialog",
            Self::Download => "#download-dialog",
            Self::ExportOauth => "#export-oauth-dialog",
            Self::ExportForm => "#export-form-dialog",
        }
    }
}

/// Endpoint a selections-form dialog submits to. Every submission flow names
/// its endpoint explicitly; there is no independently mutable shared target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitEndpoint {
    Delete,
    DownloadJson,
    Export,
}

impl SubmitEndpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Delete => "/delete",
            Self::DownloadJson => "/download-json",
            Self::Export => "/export",
        }
    }
}

/// What a binding does when its event fires. Bindings are plain data so that
/// dispatch is deterministic and inspectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    ToggleCollapse(usize),
    RecountSelection,
    DeselectAll,
    SelectAll,
    OpenMenu,
    ToggleDrawer,
    OpenDialog(DialogId),
    OpenAuthPopupThen(DialogId),
    CloseThenOpen {
        close: DialogId,
        open: DialogId,
    },
    CloseThenAuthPopupThen {
        close: DialogId,
        open: DialogId,
    },
    SubmissionDialog {
        endpoint: SubmitEndpoint,
        open: DialogId,
    },
    CloseThenSubmissionDialog {
        close: DialogId,
        endpoint: SubmitEndpoint,
        open: DialogId,
    },
}

/// Bindings keyed by node and event name, preserving registration order.
#[derive(Debug, Default, Clone)]
pub(crate) struct ActionStore {
    map: HashMap<NodeId, HashMap<String, Vec<Action>>>,
}

impl ActionStore {
    pub(crate) fn add(&mut self, node_id: NodeId, event: &str, action: Action) {
        self.map
            .entry(node_id)
            .or_default()
            .entry(event.to_string())
            .or_default()
            .push(action);
    }

    pub(crate) fn get(&self, node_id: NodeId, event: &str) -> Vec<Action> {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(event))
            .cloned()
            .unwrap_or_default()
    }
}
