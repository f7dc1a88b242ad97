use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::TestCaseResult;
use selection_page::Page;

const BOX_COUNT: usize = 4;
const SECTION_COUNT: usize = 2;

#[derive(Debug, Clone, Copy)]
enum Op {
    ClickBox(usize),
    SelectAll,
    DeselectAll,
    ToggleSection(usize),
}

fn op_strategy() -> BoxedStrategy<Op> {
    prop_oneof![
        (0..BOX_COUNT).prop_map(Op::ClickBox),
        Just(Op::SelectAll),
        Just(Op::DeselectAll),
        (0..SECTION_COUNT).prop_map(Op::ToggleSection),
    ]
    .boxed()
}

fn fixture_page() -> String {
    let mut sections = String::new();
    for section in 0..SECTION_COUNT {
        let mut items = String::new();
        for slot in 0..BOX_COUNT / SECTION_COUNT {
            let id = format!("box-{}", section * (BOX_COUNT / SECTION_COUNT) + slot);
            items.push_str(&format!(
                r#"
                <li class="mdc-list-item">
                  <div class="mdc-form-field">
                    <div class="mdc-checkbox mdc-checkbox--selected">
                      <input type="checkbox" id="{id}" class="selection-checkbox mdc-checkbox__native-control">
                    </div>
                    <label for="{id}">{id}</label>
                  </div>
                </li>"#
            ));
        }
        sections.push_str(&format!(
            r#"
            <h3 class="mdc-list-group__subheader">section-{section}
              <button id="collapse-{section}" class="collapse-btn btn">expand_less</button>
            </h3>
            <div id="content-{section}" class="mdc-list-group">
              <ul class="mdc-list">{items}</ul>
            </div>"#
        ));
    }

    let mut dialogs = String::new();
    for id in [
        "del-acc-dialog",
        "delete-sel-dialog",
        "import-oauth-dialog",
        "import-form-dialog",
        "export-choice-dialog",
        "download-dialog",
        "export-oauth-dialog",
        "export-form-dialog",
    ] {
        dialogs.push_str(&format!(
            r#"<div id="{id}" class="mdc-dialog"><div class="mdc-dialog__surface"></div></div>"#
        ));
    }

    format!(
        r#"
<header id="app-bar" class="mdc-top-app-bar mdc-top-app-bar--regular">
  <span class="mdc-top-app-bar__title">Your library</span>
</header>
<header class="mdc-top-app-bar mdc-top-app-bar--contextual hidden-item">
  <button id="deselect_all" class="btn">close</button>
  <span class="mdc-top-app-bar__title">0 selected</span>
  <button id="select-all-btn" class="btn">select_all</button>
</header>
<aside class="mdc-drawer"></aside>
<div class="mdc-menu mdc-menu-surface"></div>
<main id="main-content">
  <p id="import-suggest" class="hidden-item"></p>
  <form id="selections" method="post" action="/delete">
    <div id="list-categories">{sections}</div>
  </form>
</main>
{dialogs}"#
    )
}

/// Random interleavings of checkbox clicks, select-all, and deselect-all
/// always leave the bars agreeing with the actual checked state: the
/// contextual bar is visible iff at least one box is checked, and any
/// operation that recounts also rewrites the title.
fn check_selection_invariants(ops: &[Op]) -> TestCaseResult {
    let mut page = Page::open(&fixture_page()).map_err(|err| {
        TestCaseError::fail(format!("page setup failed: {err}"))
    })?;
    let mut model_checked = [false; BOX_COUNT];

    for &op in ops {
        let recounts = match op {
            Op::ClickBox(index) => {
                model_checked[index] = !model_checked[index];
                page.click(&format!("#box-{index}"))
                    .map_err(|err| TestCaseError::fail(err.to_string()))?;
                true
            }
            Op::SelectAll => {
                model_checked = [true; BOX_COUNT];
                page.click("#select-all-btn")
                    .map_err(|err| TestCaseError::fail(err.to_string()))?;
                true
            }
            Op::DeselectAll => {
                model_checked = [false; BOX_COUNT];
                page.click("#deselect_all")
                    .map_err(|err| TestCaseError::fail(err.to_string()))?;
                false
            }
            Op::ToggleSection(index) => {
                page.click(&format!("#collapse-{index}"))
                    .map_err(|err| TestCaseError::fail(err.to_string()))?;
                false
            }
        };

        let expected = model_checked.iter().filter(|checked| **checked).count();
        prop_assert_eq!(page.selected_count(), expected);

        let contextual_hidden = page
            .has_class(".mdc-top-app-bar--contextual", "hidden-item")
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        let regular_hidden = page
            .has_class(".mdc-top-app-bar--regular", "hidden-item")
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert_ne!(contextual_hidden, regular_hidden);
        prop_assert_eq!(contextual_hidden, expected == 0);

        if recounts {
            let title = page
                .text(".mdc-top-app-bar__title")
                .map_err(|err| TestCaseError::fail(err.to_string()))?;
            prop_assert_eq!(title.trim(), format!("{expected} selected"));
        }
    }
    Ok(())
}

/// Any sequence of collapse clicks leaves each section's glyph and hidden
/// class agreeing with the toggle parity, independently per section.
fn check_collapse_parity(toggles: &[usize]) -> TestCaseResult {
    let mut page = Page::open(&fixture_page()).map_err(|err| {
        TestCaseError::fail(format!("page setup failed: {err}"))
    })?;
    let mut collapsed = [false; SECTION_COUNT];

    for &index in toggles {
        collapsed[index] = !collapsed[index];
        page.click(&format!("#collapse-{index}"))
            .map_err(|err| TestCaseError::fail(err.to_string()))?;

        for (section, section_collapsed) in collapsed.iter().enumerate() {
            let glyph = page
                .text(&format!("#collapse-{section}"))
                .map_err(|err| TestCaseError::fail(err.to_string()))?;
            let expected_glyph = if *section_collapsed {
                "expand_more"
            } else {
                "expand_less"
            };
            prop_assert_eq!(glyph.trim(), expected_glyph);

            let hidden = page
                .has_class(&format!("#content-{section}"), "hidden-item")
                .map_err(|err| TestCaseError::fail(err.to_string()))?;
            prop_assert_eq!(hidden, *section_collapsed);
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn selection_bars_always_agree_with_checked_state(ops in vec(op_strategy(), 0..40)) {
        check_selection_invariants(&ops)?;
    }

    #[test]
    fn collapse_state_matches_toggle_parity(toggles in vec(0..SECTION_COUNT, 0..32)) {
        check_collapse_parity(&toggles)?;
    }
}
