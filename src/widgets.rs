use super::*;

pub(crate) const DIALOG_OPEN_CLASS: &str = "mdc-dialog--open";
pub(crate) const MENU_OPEN_CLASS: &str = "mdc-menu-surface--open";
pub(crate) const DRAWER_OPEN_CLASS: &str = "mdc-drawer--open";
pub(crate) const DIALOG_SURFACE_CLASS: &str = "mdc-dialog__surface";

/// The interactive behaviors the page attaches to rendered elements. Stands
/// in for the widget library: attachment is validated and idempotent, and
/// open/close state lives in the DOM as a class on the host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Ripple,
    TextField,
    Checkbox,
    FormField,
    Drawer,
    TopAppBar,
    Menu,
    Dialog,
}

impl WidgetKind {
    fn name(self) -> &'static str {
        match self {
            Self::Ripple => "ripple",
            Self::TextField => "text field",
            Self::Checkbox => "checkbox",
            Self::FormField => "form field",
            Self::Drawer => "drawer",
            Self::TopAppBar => "top app bar",
            Self::Menu => "menu",
            Self::Dialog => "dialog",
        }
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct WidgetRegistry {
    attached: HashMap<NodeId, HashSet<WidgetKind>>,
    scroll_targets: HashMap<NodeId, NodeId>,
}

impl WidgetRegistry {
    /// Attaches a widget behavior to a host element. Returns `false` when the
    /// same behavior was already attached to the same host (a no-op), and
    /// fails when the host lacks the child structure the behavior requires.
    pub(crate) fn attach(&mut self, dom: &Dom, node_id: NodeId, kind: WidgetKind) -> Result<bool> {
        if self
            .attached
            .get(&node_id)
            .is_some_and(|kinds| kinds.contains(&kind))
        {
            return Ok(false);
        }
        validate_host_structure(dom, node_id, kind)?;
        self.attached.entry(node_id).or_default().insert(kind);
        Ok(true)
    }

    pub(crate) fn is_attached(&self, node_id: NodeId, kind: WidgetKind) -> bool {
        self.attached
            .get(&node_id)
            .is_some_and(|kinds| kinds.contains(&kind))
    }

    pub(crate) fn set_scroll_target(&mut self, bar: NodeId, target: NodeId) {
        self.scroll_targets.insert(bar, target);
    }

    pub(crate) fn scroll_target(&self, bar: NodeId) -> Option<NodeId> {
        self.scroll_targets.get(&bar).copied()
    }
}

fn validate_host_structure(dom: &Dom, node_id: NodeId, kind: WidgetKind) -> Result<()> {
    let ok = match kind {
        WidgetKind::TextField => descendants(dom, node_id).into_iter().any(|child| {
            matches!(dom.tag_name(child), Some("input") | Some("textarea"))
        }),
        WidgetKind::Checkbox => descendants(dom, node_id)
            .into_iter()
            .any(|child| dom.is_checkbox(child)),
        WidgetKind::Dialog => descendants(dom, node_id)
            .into_iter()
            .any(|child| dom.has_class(child, DIALOG_SURFACE_CLASS)),
        _ => true,
    };
    if ok {
        Ok(())
    } else {
        Err(Error::Widget(format!(
            "{} host {} lacks required child structure",
            kind.name(),
            dom.snippet(node_id)
        )))
    }
}

fn descendants(dom: &Dom, node_id: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack = dom.children(node_id).to_vec();
    while let Some(current) = stack.pop() {
        if dom.element(current).is_some() {
            out.push(current);
        }
        stack.extend_from_slice(dom.children(current));
    }
    out
}

pub(crate) fn open_dialog(dom: &mut Dom, node_id: NodeId) {
    dom.add_class(node_id, DIALOG_OPEN_CLASS);
}

pub(crate) fn close_dialog(dom: &mut Dom, node_id: NodeId) {
    dom.remove_class(node_id, DIALOG_OPEN_CLASS);
}

pub(crate) fn is_dialog_open(dom: &Dom, node_id: NodeId) -> bool {
    dom.has_class(node_id, DIALOG_OPEN_CLASS)
}

pub(crate) fn open_menu(dom: &mut Dom, node_id: NodeId) {
    dom.add_class(node_id, MENU_OPEN_CLASS);
}

pub(crate) fn is_menu_open(dom: &Dom, node_id: NodeId) -> bool {
    dom.has_class(node_id, MENU_OPEN_CLASS)
}

pub(crate) fn toggle_drawer(dom: &mut Dom, node_id: NodeId) {
    dom.toggle_class(node_id, DRAWER_OPEN_CLASS);
}

pub(crate) fn is_drawer_open(dom: &Dom, node_id: NodeId) -> bool {
    dom.has_class(node_id, DRAWER_OPEN_CLASS)
}
