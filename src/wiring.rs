use super::*;
use crate::actions::DialogId::*;
use crate::selector::{query_all, query_first};

pub(crate) const HIDDEN_CLASS: &str = "hidden-item";
pub(crate) const GLYPH_EXPANDED: &str = "expand_less";
pub(crate) const GLYPH_COLLAPSED: &str = "expand_more";
pub(crate) const NAV_EVENT: &str = "MDCTopAppBar:nav";
pub(crate) const AUTH_SIGNIN_URL: &str = "/auth/google/signin";
pub(crate) const AUTH_WINDOW_NAME: &str = "authURL";
pub(crate) const AUTH_WINDOW_FEATURES: &str = "width=400,height=600";

const CHECKED_IN_CATEGORIES: &str =
    "#list-categories input[type=checkbox]:checked:not(:disabled)";
const DESELECT_SCOPE: &str = ".mdc-checkbox--selected input[type=checkbox]:not(:disabled)";
const UNCHECKED_ANYWHERE: &str = "input[type=checkbox]:not(:checked)";

/// Expand/collapse state of one collapsible section. This enum is the single
/// source of truth; the control glyph and the content's hidden class are both
/// derived from it on every transition, so they cannot desync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CollapseState {
    Expanded,
    Collapsed,
}

impl CollapseState {
    pub(crate) fn toggled(self) -> Self {
        match self {
            Self::Expanded => Self::Collapsed,
            Self::Collapsed => Self::Expanded,
        }
    }

    pub(crate) fn glyph(self) -> &'static str {
        match self {
            Self::Expanded => GLYPH_EXPANDED,
            Self::Collapsed => GLYPH_COLLAPSED,
        }
    }

    pub(crate) fn content_hidden(self) -> bool {
        matches!(self, Self::Collapsed)
    }

    fn from_glyph(glyph: &str) -> Self {
        if glyph.trim() == GLYPH_EXPANDED {
            Self::Expanded
        } else {
            Self::Collapsed
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct CollapseSection {
    pub(crate) control: NodeId,
    pub(crate) content: NodeId,
    pub(crate) state: CollapseState,
}

/// Handles resolved during page setup plus the controller-owned state the
/// DOM does not carry. Constructed only by [`PageWiring::install`]; holding
/// one is the signal that every binding is in place.
#[derive(Debug, Clone)]
pub(crate) struct PageWiring {
    pub(crate) top_bar_regular: NodeId,
    pub(crate) top_bar_contextual: NodeId,
    pub(crate) selections_form: NodeId,
    pub(crate) drawer: NodeId,
    pub(crate) app_bar: NodeId,
    pub(crate) menu: NodeId,
    dialogs: HashMap<DialogId, NodeId>,
    pub(crate) collapse_sections: Vec<CollapseSection>,
    pub(crate) pending_submission: Option<SubmitEndpoint>,
}

impl PageWiring {
    /// One-time page setup, run before any interaction is possible. The five
    /// phases run in order: widget activation, empty-group pruning, collapse
    /// wiring, selection wiring, dialog and navigation wiring.
    pub(crate) fn install(
        dom: &mut Dom,
        actions: &mut ActionStore,
        widgets: &mut WidgetRegistry,
    ) -> Result<Self> {
        attach_widget_class(dom, widgets, ".btn", WidgetKind::Ripple)?;
        attach_widget_class(dom, widgets, ".mdc-text-field", WidgetKind::TextField)?;
        attach_widget_class(dom, widgets, ".mdc-checkbox", WidgetKind::Checkbox)?;
        attach_widget_class(dom, widgets, ".mdc-form-field", WidgetKind::FormField)?;

        prune_empty_groups(dom)?;

        let collapse_sections = wire_collapse_sections(dom, actions)?;

        let top_bar_regular = require_first(dom, ".mdc-top-app-bar--regular")?;
        let top_bar_contextual = require_first(dom, ".mdc-top-app-bar--contextual")?;
        bind_clicks(dom, actions, ".selection-checkbox", Action::RecountSelection)?;
        bind_clicks(dom, actions, "#deselect_all", Action::DeselectAll)?;
        bind_clicks(dom, actions, "#select-all-btn", Action::SelectAll)?;

        let drawer = require_first(dom, ".mdc-drawer")?;
        widgets.attach(dom, drawer, WidgetKind::Drawer)?;
        let app_bar = require_first(dom, "#app-bar")?;
        widgets.attach(dom, app_bar, WidgetKind::TopAppBar)?;
        let main_content = require_first(dom, "#main-content")?;
        widgets.set_scroll_target(app_bar, main_content);
        actions.add(app_bar, NAV_EVENT, Action::ToggleDrawer);

        let menu = require_first(dom, ".mdc-menu")?;
        widgets.attach(dom, menu, WidgetKind::Menu)?;
        bind_clicks(dom, actions, "#menu-btn", Action::OpenMenu)?;

        let selections_form = require_first(dom, "#selections")?;
        let mut dialogs = HashMap::new();
        for dialog in DialogId::ALL {
            let node = require_first(dom, dialog.selector())?;
            widgets.attach(dom, node, WidgetKind::Dialog)?;
            dialogs.insert(dialog, node);
        }

        bind_clicks(dom, actions, "#del-acc-btn", Action::OpenDialog(DelAcc))?;
        for selector in ["#delete-sel-shortcut", "#delete-sel-btn"] {
            bind_clicks(
                dom,
                actions,
                selector,
                Action::SubmissionDialog {
                    endpoint: SubmitEndpoint::Delete,
                    open: DeleteSel,
                },
            )?;
        }

        for selector in ["#import-more-btn", "#import-suggest-btn"] {
            bind_clicks(dom, actions, selector, Action::OpenAuthPopupThen(ImportOauth))?;
        }
        bind_clicks(
            dom,
            actions,
            "#import-oauth-next-btn",
            Action::CloseThenOpen {
                close: ImportOauth,
                open: ImportForm,
            },
        )?;

        for selector in ["#export-sel-btn", "#export-sel-shortcut"] {
            bind_clicks(dom, actions, selector, Action::OpenDialog(ExportChoice))?;
        }
        bind_clicks(
            dom,
            actions,
            "#download-choice-btn",
            Action::CloseThenSubmissionDialog {
                close: ExportChoice,
                endpoint: SubmitEndpoint::DownloadJson,
                open: Download,
            },
        )?;
        bind_clicks(
            dom,
            actions,
            "#export-choice-btn",
            Action::CloseThenAuthPopupThen {
                close: ExportChoice,
                open: ExportOauth,
            },
        )?;
        bind_clicks(
            dom,
            actions,
            "#export-oauth-next-btn",
            Action::CloseThenSubmissionDialog {
                close: ExportOauth,
                endpoint: SubmitEndpoint::Export,
                open: ExportForm,
            },
        )?;

        Ok(Self {
            top_bar_regular,
            top_bar_contextual,
            selections_form,
            drawer,
            app_bar,
            menu,
            dialogs,
            collapse_sections,
            pending_submission: None,
        })
    }

    pub(crate) fn dialog_node(&self, dialog: DialogId) -> NodeId {
        self.dialogs[&dialog]
    }

    /// Count of checked, enabled selection checkboxes inside the categories
    /// list. Zero when the whole list was pruned away.
    pub(crate) fn selected_count(&self, dom: &Dom) -> usize {
        query_all(dom, CHECKED_IN_CATEGORIES)
            .map(|matches| matches.len())
            .unwrap_or(0)
    }

    /// Recomputes the selected count, rewrites every top-bar title, and picks
    /// the bar variant: contextual iff the count is positive. The two bars
    /// are never visible together.
    pub(crate) fn recount_selection(&self, dom: &mut Dom) -> Result<()> {
        let count = self.selected_count(dom);
        let title = format!("{count} selected");
        for node in query_all(dom, ".mdc-top-app-bar__title")? {
            dom.set_text_content(node, &title);
        }
        if count > 0 {
            dom.add_class(self.top_bar_regular, HIDDEN_CLASS);
            dom.remove_class(self.top_bar_contextual, HIDDEN_CLASS);
        } else {
            dom.add_class(self.top_bar_contextual, HIDDEN_CLASS);
            dom.remove_class(self.top_bar_regular, HIDDEN_CLASS);
        }
        Ok(())
    }

    /// Unchecks every enabled checkbox inside a selected checkbox wrapper and
    /// forces the regular bar back unconditionally, without recounting.
    /// Narrower in scope than [`Self::select_all`]; the asymmetry is the
    /// page's established behavior and is pinned by tests.
    pub(crate) fn deselect_all(&self, dom: &mut Dom) -> Result<()> {
        for node in query_all(dom, DESELECT_SCOPE)? {
            dom.set_checked(node, false);
        }
        dom.add_class(self.top_bar_contextual, HIDDEN_CLASS);
        dom.remove_class(self.top_bar_regular, HIDDEN_CLASS);
        Ok(())
    }

    /// Checks every unchecked checkbox on the page, then recounts.
    pub(crate) fn select_all(&self, dom: &mut Dom) -> Result<()> {
        for node in query_all(dom, UNCHECKED_ANYWHERE)? {
            dom.set_checked(node, true);
        }
        self.recount_selection(dom)
    }

    pub(crate) fn toggle_collapse(&mut self, dom: &mut Dom, index: usize) {
        let Some(section) = self.collapse_sections.get(index).copied() else {
            return;
        };
        let next = section.state.toggled();
        self.collapse_sections[index].state = next;
        dom.set_text_content(section.control, next.glyph());
        if next.content_hidden() {
            dom.add_class(section.content, HIDDEN_CLASS);
        } else {
            dom.remove_class(section.content, HIDDEN_CLASS);
        }
    }
}

fn attach_widget_class(
    dom: &Dom,
    widgets: &mut WidgetRegistry,
    selector: &str,
    kind: WidgetKind,
) -> Result<()> {
    for node in query_all(dom, selector)? {
        widgets.attach(dom, node, kind)?;
    }
    Ok(())
}

/// Removes every list-group section whose list has no items, together with
/// the section header preceding it. When the categories list itself ends up
/// empty it is removed entirely and the import suggestion is revealed.
fn prune_empty_groups(dom: &mut Dom) -> Result<()> {
    for group in query_all(dom, ".mdc-list-group")? {
        if !dom.is_connected(group) {
            continue;
        }
        let has_empty_list = dom
            .element_children(group)
            .into_iter()
            .any(|list| dom.element_children(list).is_empty());
        if has_empty_list {
            if let Some(header) = dom.previous_element_sibling(group) {
                dom.remove_node(header);
            }
            dom.remove_node(group);
        }
    }

    if let Some(categories) = query_first(dom, "#list-categories")? {
        if dom.element_children(categories).is_empty() {
            dom.remove_node(categories);
            let suggest = require_first(dom, "#import-suggest")?;
            dom.remove_class(suggest, HIDDEN_CLASS);
        }
    }
    Ok(())
}

/// Resolves each collapse control and its content container (the control's
/// parent's next element sibling). Controls without a content container are
/// left unwired.
fn wire_collapse_sections(dom: &Dom, actions: &mut ActionStore) -> Result<Vec<CollapseSection>> {
    let mut sections = Vec::new();
    for control in query_all(dom, ".collapse-btn")? {
        let content = dom
            .parent(control)
            .and_then(|parent| dom.next_element_sibling(parent));
        let Some(content) = content else {
            continue;
        };
        let state = CollapseState::from_glyph(&dom.text_content(control));
        let index = sections.len();
        sections.push(CollapseSection {
            control,
            content,
            state,
        });
        actions.add(control, "click", Action::ToggleCollapse(index));
    }
    Ok(sections)
}

fn bind_clicks(
    dom: &Dom,
    actions: &mut ActionStore,
    selector: &str,
    action: Action,
) -> Result<()> {
    for node in query_all(dom, selector)? {
        actions.add(node, "click", action);
    }
    Ok(())
}

pub(crate) fn require_first(dom: &Dom, selector: &str) -> Result<NodeId> {
    query_first(dom, selector)?.ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
}
