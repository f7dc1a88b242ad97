use super::*;


/// One selection list item. The wrapper carries the selected modifier class
/// when the box is rendered checked, the way the server templates emit it.
fn item_html(id: &str, checked: bool, disabled: bool) -> String {
    let selected = if checked { " mdc-checkbox--selected" } else { "" };
    let checked_attr = if checked { " checked" } else { "" };
    let disabled_attr = if disabled { " disabled" } else { "" };
    format!(
        r#"
        <li class="mdc-list-item">
          <div class="mdc-form-field">
            <div class="mdc-checkbox{selected}">
              <input type="checkbox" id="{id}" class="selection-checkbox mdc-checkbox__native-control"{checked_attr}{disabled_attr}>
            </div>
            <label for="{id}">{id}</label>
          </div>
        </li>"#
    )
}

fn plain_item(id: &str) -> String {
    item_html(id, false, false)
}

/// A category section: subheader with collapse control, then the list group.
fn section_html(name: &str, items: &[String]) -> String {
    format!(
        r#"
        <h3 class="mdc-list-group__subheader">{name}
          <button id="collapse-{name}" class="collapse-btn material-icons btn">expand_less</button>
        </h3>
        <div class="mdc-list-group">
          <ul class="mdc-list">{}</ul>
        </div>"#,
        items.concat()
    )
}

fn dialog_html(id: &str, body: &str) -> String {
    format!(
        r#"
        <div id="{id}" class="mdc-dialog">
          <div class="mdc-dialog__surface">{body}</div>
        </div>"#
    )
}

fn all_dialogs_html() -> String {
    [
        dialog_html("del-acc-dialog", "<p>Really delete your account?</p>"),
        dialog_html("delete-sel-dialog", "<p>Delete the selected entries?</p>"),
        dialog_html(
            "import-oauth-dialog",
            r#"<p>Finish signing in, then continue.</p>
               <button id="import-oauth-next-btn" class="btn">Next</button>"#,
        ),
        dialog_html(
            "import-form-dialog",
            r#"<label class="mdc-text-field"><input type="text" class="mdc-text-field__input"></label>"#,
        ),
        dialog_html(
            "export-choice-dialog",
            r#"<button id="download-choice-btn" class="btn">Download</button>
               <button id="export-choice-btn" class="btn">Send to account</button>"#,
        ),
        dialog_html("download-dialog", "<p>Your download is being prepared.</p>"),
        dialog_html(
            "export-oauth-dialog",
            r#"<p>Finish signing in, then continue.</p>
               <button id="export-oauth-next-btn" class="btn">Next</button>"#,
        ),
        dialog_html(
            "export-form-dialog",
            r#"<label class="mdc-text-field"><input type="text" class="mdc-text-field__input"></label>"#,
        ),
    ]
    .concat()
}

/// Full page scaffold: both top bars, drawer, menu, the selections form with
/// the categories list, the standalone action buttons, and all dialogs.
fn page_html(sections: &str, extra_main: &str) -> String {
    let dialogs = all_dialogs_html();
    format!(
        r#"
<header id="app-bar" class="mdc-top-app-bar mdc-top-app-bar--regular">
  <button class="material-icons mdc-top-app-bar__navigation-icon btn">menu</button>
  <span class="mdc-top-app-bar__title">Your library</span>
  <button id="menu-btn" class="btn">more_vert</button>
</header>
<header class="mdc-top-app-bar mdc-top-app-bar--contextual hidden-item">
  <button id="deselect_all" class="btn">close</button>
  <span class="mdc-top-app-bar__title">0 selected</span>
  <button id="select-all-btn" class="btn">select_all</button>
  <button id="delete-sel-shortcut" class="btn">delete</button>
  <button id="export-sel-shortcut" class="btn">share</button>
</header>
<aside class="mdc-drawer">
  <nav class="mdc-list">
    <a class="mdc-list-item" href="/">Home</a>
  </nav>
</aside>
<div class="mdc-menu mdc-menu-surface">
  <ul class="mdc-list">
    <li class="mdc-list-item" id="del-acc-btn">Delete account</li>
  </ul>
</div>
<main id="main-content">
  <p id="import-suggest" class="hidden-item">
    Nothing here yet.
    <button id="import-suggest-btn" class="btn">Import playlists</button>
  </p>
  <form id="selections" method="post" action="/delete">
    <div id="list-categories">{sections}</div>
  </form>
  <button id="import-more-btn" class="btn">Import more</button>
  <button id="delete-sel-btn" class="btn">Delete selected</button>
  <button id="export-sel-btn" class="btn">Export selected</button>
  {extra_main}
</main>
{dialogs}"#
    )
}

/// Two populated sections, nothing pre-checked.
fn default_page_html() -> String {
    let sections = [
        section_html("playlists", &[plain_item("box-p1"), plain_item("box-p2")]),
        section_html("albums", &[plain_item("box-a1")]),
    ]
    .concat();
    page_html(&sections, "")
}

fn default_page() -> Result<Page> {
    Page::open(&default_page_html())
}
