use super::*;
use crate::selector::query_all;
use crate::widgets;
use crate::wiring::{
    AUTH_SIGNIN_URL, AUTH_WINDOW_FEATURES, AUTH_WINDOW_NAME, require_first,
};

/// Whether the environment grants popup windows. The page cannot tell the
/// difference up front; flows proceed either way, but the outcome is
/// recorded so tests can cover the blocked case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PopupPolicy {
    #[default]
    AllowAll,
    BlockAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupOutcome {
    Opened,
    Blocked,
}

/// One popup-window request, as issued by an OAuth entry flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupRequest {
    pub url: String,
    pub window_name: String,
    pub features: String,
    pub outcome: PopupOutcome,
}

/// One recorded form submission, captured instead of performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub action: String,
    pub method: String,
}

/// A loaded, fully wired page. Construction parses the markup and runs the
/// one-time setup; the `Ok` return is the ready signal, after which every
/// driver method observes a completely bound page.
#[derive(Debug)]
pub struct Page {
    dom: Dom,
    actions: ActionStore,
    widgets: WidgetRegistry,
    wiring: PageWiring,
    popup_policy: PopupPolicy,
    popups: Vec<PopupRequest>,
    submissions: Vec<FormSubmission>,
    trace: Vec<String>,
}

impl Page {
    pub fn open(html: &str) -> Result<Self> {
        Self::open_with_popup_policy(html, PopupPolicy::AllowAll)
    }

    pub fn open_with_popup_policy(html: &str, popup_policy: PopupPolicy) -> Result<Self> {
        let mut dom = html::parse_html(html)?;
        let mut actions = ActionStore::default();
        let mut widgets = WidgetRegistry::default();
        let wiring = PageWiring::install(&mut dom, &mut actions, &mut widgets)?;
        Ok(Self {
            dom,
            actions,
            widgets,
            wiring,
            popup_policy,
            popups: Vec::new(),
            submissions: Vec::new(),
            trace: Vec::new(),
        })
    }

    /// Clicks the first element matching the selector. A disabled form
    /// control swallows the click entirely and fires no event. A checkbox
    /// input flips its checked state before any bound action runs, matching
    /// native activation order; the event then bubbles through the ancestors.
    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = require_first(&self.dom, selector)?;
        if self.dom.disabled(target)
            && matches!(
                self.dom.tag_name(target),
                Some("input" | "button" | "select" | "textarea")
            )
        {
            return Ok(());
        }
        if self.dom.is_checkbox(target) {
            let next = !self.dom.checked(target);
            self.dom.set_checked(target, next);
        }
        self.dispatch_event(target, "click")
    }

    /// Fires a named event on the first match, without any native control
    /// step. Used for widget-emitted events such as the top bar's nav event.
    pub fn dispatch(&mut self, selector: &str, event: &str) -> Result<()> {
        let target = require_first(&self.dom, selector)?;
        self.dispatch_event(target, event)
    }

    /// Sets a checkbox programmatically. No events fire.
    pub fn set_checked(&mut self, selector: &str, checked: bool) -> Result<()> {
        let target = require_first(&self.dom, selector)?;
        if !self.dom.is_checkbox(target) {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "checkbox input".to_string(),
                actual: self.dom.snippet(target),
            });
        }
        self.dom.set_checked(target, checked);
        Ok(())
    }

    /// Records a submission of the matched form with its current action and
    /// method attributes. The request is captured, not performed.
    pub fn submit(&mut self, selector: &str) -> Result<()> {
        let target = require_first(&self.dom, selector)?;
        if self.dom.tag_name(target) != Some("form") {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "form".to_string(),
                actual: self.dom.snippet(target),
            });
        }
        let action = self.dom.attr(target, "action").unwrap_or("").to_string();
        let method = self
            .dom
            .attr(target, "method")
            .unwrap_or("get")
            .to_ascii_lowercase();
        self.trace.push(format!("form submitted: {method} {action}"));
        self.submissions.push(FormSubmission { action, method });
        Ok(())
    }

    fn dispatch_event(&mut self, target: NodeId, event: &str) -> Result<()> {
        let mut chain = vec![target];
        chain.extend(self.dom.ancestors(target));
        for node in chain {
            for action in self.actions.get(node, event) {
                self.apply_action(action)?;
            }
        }
        Ok(())
    }

    fn apply_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::ToggleCollapse(index) => {
                self.wiring.toggle_collapse(&mut self.dom, index);
                Ok(())
            }
            Action::RecountSelection => self.wiring.recount_selection(&mut self.dom),
            Action::DeselectAll => self.wiring.deselect_all(&mut self.dom),
            Action::SelectAll => self.wiring.select_all(&mut self.dom),
            Action::OpenMenu => {
                widgets::open_menu(&mut self.dom, self.wiring.menu);
                Ok(())
            }
            Action::ToggleDrawer => {
                widgets::toggle_drawer(&mut self.dom, self.wiring.drawer);
                Ok(())
            }
            Action::OpenDialog(dialog) => {
                self.open_dialog(dialog);
                Ok(())
            }
            Action::OpenAuthPopupThen(dialog) => {
                self.open_auth_popup();
                self.open_dialog(dialog);
                Ok(())
            }
            Action::CloseThenOpen { close, open } => {
                self.close_dialog(close);
                self.open_dialog(open);
                Ok(())
            }
            Action::CloseThenAuthPopupThen { close, open } => {
                self.close_dialog(close);
                self.open_auth_popup();
                self.open_dialog(open);
                Ok(())
            }
            Action::SubmissionDialog { endpoint, open } => {
                self.open_submission_dialog(endpoint, open);
                Ok(())
            }
            Action::CloseThenSubmissionDialog {
                close,
                endpoint,
                open,
            } => {
                self.close_dialog(close);
                self.open_submission_dialog(endpoint, open);
                Ok(())
            }
        }
    }

    /// Records the pending submission target, derives the selections form's
    /// action attribute from it, and opens the dialog in the same step. The
    /// last call wholly determines the pending target.
    fn open_submission_dialog(&mut self, endpoint: SubmitEndpoint, dialog: DialogId) {
        self.wiring.pending_submission = Some(endpoint);
        let form = self.wiring.selections_form;
        self.dom.set_attr(form, "action", endpoint.path());
        self.trace
            .push(format!("submission target set: {}", endpoint.path()));
        self.open_dialog(dialog);
    }

    fn open_auth_popup(&mut self) {
        let outcome = match self.popup_policy {
            PopupPolicy::AllowAll => PopupOutcome::Opened,
            PopupPolicy::BlockAll => PopupOutcome::Blocked,
        };
        self.trace.push(match outcome {
            PopupOutcome::Opened => format!("popup opened: {AUTH_SIGNIN_URL}"),
            PopupOutcome::Blocked => format!("popup blocked: {AUTH_SIGNIN_URL}"),
        });
        self.popups.push(PopupRequest {
            url: AUTH_SIGNIN_URL.to_string(),
            window_name: AUTH_WINDOW_NAME.to_string(),
            features: AUTH_WINDOW_FEATURES.to_string(),
            outcome,
        });
    }

    fn open_dialog(&mut self, dialog: DialogId) {
        let node = self.wiring.dialog_node(dialog);
        if !widgets::is_dialog_open(&self.dom, node) {
            widgets::open_dialog(&mut self.dom, node);
            self.trace.push(format!("dialog opened: {}", dialog.selector()));
        }
    }

    fn close_dialog(&mut self, dialog: DialogId) {
        let node = self.wiring.dialog_node(dialog);
        if widgets::is_dialog_open(&self.dom, node) {
            widgets::close_dialog(&mut self.dom, node);
            self.trace.push(format!("dialog closed: {}", dialog.selector()));
        }
    }

    pub fn text(&self, selector: &str) -> Result<String> {
        let target = require_first(&self.dom, selector)?;
        Ok(self.dom.text_content(target))
    }

    pub fn has_class(&self, selector: &str, class_name: &str) -> Result<bool> {
        let target = require_first(&self.dom, selector)?;
        Ok(self.dom.has_class(target, class_name))
    }

    pub fn exists(&self, selector: &str) -> Result<bool> {
        Ok(!query_all(&self.dom, selector)?.is_empty())
    }

    pub fn attr(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let target = require_first(&self.dom, selector)?;
        Ok(self.dom.attr(target, name).map(str::to_string))
    }

    pub fn checked(&self, selector: &str) -> Result<bool> {
        let target = require_first(&self.dom, selector)?;
        Ok(self.dom.checked(target))
    }

    pub fn count(&self, selector: &str) -> Result<usize> {
        Ok(query_all(&self.dom, selector)?.len())
    }

    pub fn widget_attached(&self, selector: &str, kind: WidgetKind) -> Result<bool> {
        let target = require_first(&self.dom, selector)?;
        Ok(self.widgets.is_attached(target, kind))
    }

    pub fn dialog_open(&self, dialog: DialogId) -> bool {
        widgets::is_dialog_open(&self.dom, self.wiring.dialog_node(dialog))
    }

    pub fn drawer_open(&self) -> bool {
        widgets::is_drawer_open(&self.dom, self.wiring.drawer)
    }

    pub fn menu_open(&self) -> bool {
        widgets::is_menu_open(&self.dom, self.wiring.menu)
    }

    pub fn selected_count(&self) -> usize {
        self.wiring.selected_count(&self.dom)
    }

    pub fn pending_submission(&self) -> Option<SubmitEndpoint> {
        self.wiring.pending_submission
    }

    pub fn popups(&self) -> &[PopupRequest] {
        &self.popups
    }

    pub fn submissions(&self) -> &[FormSubmission] {
        &self.submissions
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.trace)
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = require_first(&self.dom, selector)?;
        let actual = self.dom.text_content(target);
        if actual.trim() == expected.trim() {
            Ok(())
        } else {
            Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.dom.snippet(target),
            })
        }
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        if self.exists(selector)? {
            Ok(())
        } else {
            Err(Error::SelectorNotFound(selector.to_string()))
        }
    }

    pub fn assert_checked(&self, selector: &str, expected: bool) -> Result<()> {
        let target = require_first(&self.dom, selector)?;
        let actual = self.dom.checked(target);
        if actual == expected {
            Ok(())
        } else {
            Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual: actual.to_string(),
                dom_snippet: self.dom.snippet(target),
            })
        }
    }

    pub fn assert_class(&self, selector: &str, class_name: &str, present: bool) -> Result<()> {
        let target = require_first(&self.dom, selector)?;
        let actual = self.dom.has_class(target, class_name);
        if actual == present {
            Ok(())
        } else {
            Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("class {class_name} present: {present}"),
                actual: format!("class {class_name} present: {actual}"),
                dom_snippet: self.dom.snippet(target),
            })
        }
    }
}
