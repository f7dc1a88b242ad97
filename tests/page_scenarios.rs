use selection_page::{DialogId, Page, PopupOutcome, PopupPolicy, Result, SubmitEndpoint};

fn category_item(id: &str) -> String {
    format!(
        r#"
        <li class="mdc-list-item">
          <div class="mdc-form-field">
            <div class="mdc-checkbox mdc-checkbox--selected">
              <input type="checkbox" id="{id}" class="selection-checkbox mdc-checkbox__native-control">
            </div>
            <label for="{id}">{id}</label>
          </div>
        </li>"#
    )
}

fn category_section(name: &str, items: &[String]) -> String {
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

fn dialog(id: &str, body: &str) -> String {
    format!(r#"<div id="{id}" class="mdc-dialog"><div class="mdc-dialog__surface">{body}</div></div>"#)
}

fn library_page(sections: &str) -> String {
    let dialogs = [
        dialog("del-acc-dialog", "<p>Delete account?</p>"),
        dialog("delete-sel-dialog", "<p>Delete selection?</p>"),
        dialog(
            "import-oauth-dialog",
            r#"<button id="import-oauth-next-btn" class="btn">Next</button>"#,
        ),
        dialog(
            "import-form-dialog",
            r#"<label class="mdc-text-field"><input type="text"></label>"#,
        ),
        dialog(
            "export-choice-dialog",
            r#"<button id="download-choice-btn" class="btn">Download</button>
               <button id="export-choice-btn" class="btn">Send</button>"#,
        ),
        dialog("download-dialog", "<p>Preparing download.</p>"),
        dialog(
            "export-oauth-dialog",
            r#"<button id="export-oauth-next-btn" class="btn">Next</button>"#,
        ),
        dialog(
            "export-form-dialog",
            r#"<label class="mdc-text-field"><input type="text"></label>"#,
        ),
    ]
    .concat();
    format!(
        r#"
<header id="app-bar" class="mdc-top-app-bar mdc-top-app-bar--regular">
  <span class="mdc-top-app-bar__title">Your library</span>
  <button id="menu-btn" class="btn">more_vert</button>
</header>
<header class="mdc-top-app-bar mdc-top-app-bar--contextual hidden-item">
  <button id="deselect_all" class="btn">close</button>
  <span class="mdc-top-app-bar__title">0 selected</span>
  <button id="select-all-btn" class="btn">select_all</button>
</header>
<aside class="mdc-drawer"><nav class="mdc-list"></nav></aside>
<div class="mdc-menu mdc-menu-surface">
  <ul class="mdc-list"><li class="mdc-list-item" id="del-acc-btn">Delete account</li></ul>
</div>
<main id="main-content">
  <p id="import-suggest" class="hidden-item">
    <button id="import-suggest-btn" class="btn">Import</button>
  </p>
  <form id="selections" method="post" action="/delete">
    <div id="list-categories">{sections}</div>
  </form>
  <button id="import-more-btn" class="btn">Import more</button>
  <button id="delete-sel-btn" class="btn">Delete selected</button>
  <button id="export-sel-btn" class="btn">Export selected</button>
</main>
{dialogs}"#
    )
}

fn two_section_page() -> String {
    let sections = [
        category_section(
            "playlists",
            &[category_item("box-p1"), category_item("box-p2")],
        ),
        category_section("albums", &[category_item("box-a1")]),
    ]
    .concat();
    library_page(&sections)
}

#[test]
fn empty_sections_are_pruned_before_any_interaction() -> Result<()> {
    let sections = [
        category_section("playlists", &[category_item("box-p1")]),
        category_section("albums", &[]),
    ]
    .concat();
    let page = Page::open(&library_page(&sections))?;

    assert_eq!(page.count(".mdc-list-group")?, 1);
    assert!(!page.exists("#collapse-albums")?);
    page.assert_class("#import-suggest", "hidden-item", true)?;
    Ok(())
}

#[test]
fn select_all_then_deselect_round_trip() -> Result<()> {
    let mut page = Page::open(&two_section_page())?;
    page.click("#select-all-btn")?;
    assert_eq!(page.selected_count(), 3);
    page.assert_text(".mdc-top-app-bar__title", "3 selected")?;
    page.assert_class(".mdc-top-app-bar--contextual", "hidden-item", false)?;

    page.click("#deselect_all")?;
    assert_eq!(page.selected_count(), 0);
    page.assert_checked("#box-p1", false)?;
    page.assert_class(".mdc-top-app-bar--regular", "hidden-item", false)?;
    page.assert_class(".mdc-top-app-bar--contextual", "hidden-item", true)?;
    Ok(())
}

#[test]
fn select_all_over_five_boxes_shows_five_selected() -> Result<()> {
    let sections = [
        category_section(
            "playlists",
            &[
                category_item("box-p1"),
                category_item("box-p2"),
                category_item("box-p3"),
            ],
        ),
        category_section("albums", &[category_item("box-a1"), category_item("box-a2")]),
    ]
    .concat();
    let mut page = Page::open(&library_page(&sections))?;
    page.click("#select-all-btn")?;

    page.assert_text(".mdc-top-app-bar__title", "5 selected")?;
    page.assert_class(".mdc-top-app-bar--contextual", "hidden-item", false)?;
    page.assert_class(".mdc-top-app-bar--regular", "hidden-item", true)?;
    Ok(())
}

#[test]
fn export_wizard_ends_in_a_post_to_the_chosen_endpoint() -> Result<()> {
    let mut page = Page::open(&two_section_page())?;
    page.click("#box-p1")?;
    page.click("#export-sel-btn")?;
    page.click("#export-choice-btn")?;
    page.click("#export-oauth-next-btn")?;

    assert!(page.dialog_open(DialogId::ExportForm));
    assert_eq!(page.pending_submission(), Some(SubmitEndpoint::Export));
    assert_eq!(page.popups().len(), 1);
    assert_eq!(page.popups()[0].outcome, PopupOutcome::Opened);

    page.submit("#selections")?;
    assert_eq!(page.submissions().len(), 1);
    assert_eq!(page.submissions()[0].action, "/export");
    assert_eq!(page.submissions()[0].method, "post");
    Ok(())
}

#[test]
fn import_wizard_survives_a_blocked_popup() -> Result<()> {
    let mut page = Page::open_with_popup_policy(&two_section_page(), PopupPolicy::BlockAll)?;
    page.click("#import-more-btn")?;

    assert_eq!(page.popups().len(), 1);
    assert_eq!(page.popups()[0].outcome, PopupOutcome::Blocked);
    assert!(page.dialog_open(DialogId::ImportOauth));

    page.click("#import-oauth-next-btn")?;
    assert!(page.dialog_open(DialogId::ImportForm));
    Ok(())
}

#[test]
fn collapsing_a_section_does_not_disturb_selection_mode() -> Result<()> {
    let mut page = Page::open(&two_section_page())?;
    page.click("#box-a1")?;
    page.click("#collapse-albums")?;

    page.assert_text("#collapse-albums", "expand_more")?;
    assert_eq!(page.selected_count(), 1);
    page.assert_class(".mdc-top-app-bar--contextual", "hidden-item", false)?;

    page.click("#collapse-albums")?;
    page.assert_text("#collapse-albums", "expand_less")?;
    Ok(())
}
