//! Prompt templates, one per test-case category.

use crate::model::Category;

pub const SYSTEM_INSTRUCTION: &str = "You are an expert QA UI/UX Test Engineer specializing in \
generating comprehensive UI/UX test cases. Always output valid JSON only. Focus on user \
interface testing, not backend or technical testing.";

struct Template {
    headline: &'static str,
    focus_areas: &'static [&'static str],
    requirements: &'static [&'static str],
    field_hints: [&'static str; 4],
    example: &'static str,
    closing: &'static [&'static str],
}

const HAPPY_PATH: Template = Template {
    headline: "UI/UX HAPPY PATH scenarios",
    focus_areas: &[
        "Main user flows working correctly (navigation, form submission)",
        "UI elements displaying properly (buttons, fields, labels, images)",
        "Successful scenarios (user completes tasks without errors)",
        "Page transitions and navigation between screens",
        "Data display and presentation on UI",
    ],
    requirements: &[
        "Focus ONLY on UI/UX testing (NOT backend/API/database)",
        "Test user interface elements: buttons, forms, fields, dropdowns, checkboxes, etc.",
        "Test visual elements: layout, alignment, colors, fonts, spacing",
        "Test user interactions: click, type, select, navigate",
        "Describe WHAT USER SEES and WHAT USER DOES on the UI",
    ],
    field_hints: [
        "Clear UI-focused description",
        "Detailed UI interaction steps (use \\n for line breaks)",
        "What user sees on screen (UI feedback)",
        "\"High\" for critical UI flows, \"Medium\" for secondary",
    ],
    example: r#"  {
    "description": "Verify the plan selection button displays and is clickable",
    "steps": "1. Open the plan selection page\n2. Locate the 'Premium' button\n3. Verify button is visible and enabled\n4. Click on the button",
    "expected_result": "Button changes color on hover, page navigates to the plan form, form fields are displayed correctly",
    "priority": "High"
  }"#,
    closing: &[
        "Focus on UI elements, user interactions, visual verification",
        "NO technical/backend testing (no API, database, server tests)",
    ],
};

const VALIDATION: Template = Template {
    headline: "UI VALIDATION & USER INTERACTIONS",
    focus_areas: &[
        "Form field validation (required fields, format validation, length limits)",
        "Input field behaviors (placeholder text, error messages, success indicators)",
        "Button states (enabled/disabled/loading states)",
        "Dropdown/select behaviors (options display, selection feedback)",
        "Checkbox/radio button interactions",
        "Error message display and formatting",
        "Tooltip and help text display",
        "User input feedback (typing indicators, character counters)",
    ],
    requirements: &[
        "Focus on UI VALIDATION and USER INTERACTION feedback",
        "Test what happens when user enters invalid/valid data",
        "Test UI response to user actions",
        "Verify error messages, validation messages display correctly on UI",
        "Test field-level interactions (focus, blur, typing, selecting)",
    ],
    field_hints: [
        "Clear UI validation scenario",
        "Detailed interaction steps on UI",
        "UI feedback user sees (error messages, visual indicators)",
        "\"Medium\" for most validation tests",
    ],
    example: r#"  {
    "description": "Verify error message displays when required field is left empty",
    "steps": "1. Open the application form\n2. Leave 'Full Name' field empty\n3. Click Submit button\n4. Observe error message",
    "expected_result": "Red error message appears below field stating 'Full Name is required', field border turns red, submit button remains enabled",
    "priority": "Medium"
  }"#,
    closing: &[
        "Focus on UI validation feedback, not backend validation",
        "Test visual feedback user sees on screen",
    ],
};

const EDGE_CASES: Template = Template {
    headline: "UI EDGE CASES, RESPONSIVE DESIGN, and CROSS-BROWSER testing",
    focus_areas: &[
        "Boundary testing (max length inputs, special characters, very long text)",
        "Responsive design (mobile, tablet, desktop views)",
        "Browser compatibility (Chrome, Safari, Firefox, Edge)",
        "UI edge cases (window resize, zoom in/out, orientation change)",
        "Accessibility (keyboard navigation, tab order, screen reader support)",
        "Visual regression (layout breaks, overlapping elements, cut-off text)",
        "Empty states and loading states",
        "Performance UI feedback (slow loading, large data sets)",
    ],
    requirements: &[
        "Focus on EDGE CASES and CROSS-DEVICE testing",
        "Test UI behavior in unusual but valid scenarios",
        "Test responsive design across different screen sizes",
        "Test accessibility features",
        "Verify UI doesn't break under edge conditions",
    ],
    field_hints: [
        "Clear edge case or responsive scenario",
        "Detailed steps including device/browser context",
        "UI behavior and layout expectations",
        "\"Medium\" or \"Low\" based on criticality",
    ],
    example: r#"  {
    "description": "Verify form layout remains intact when browser window is resized to tablet width (768px)",
    "steps": "1. Open the form on a desktop browser\n2. Resize browser window to 768px width\n3. Observe form layout and field alignment\n4. Try filling and submitting form",
    "expected_result": "Form fields stack vertically, buttons remain visible and clickable, no horizontal scrolling, no overlapping elements",
    "priority": "Medium"
  }"#,
    closing: &[
        "Focus on UI edge cases, responsive behavior, visual consistency",
        "Test cross-device and cross-browser UI rendering",
    ],
};

fn template(category: Category) -> &'static Template {
    match category {
        Category::HappyPath => &HAPPY_PATH,
        Category::Validation => &VALIDATION,
        Category::EdgeCases => &EDGE_CASES,
    }
}

/// Builds the user instruction for one batch. `document` is embedded verbatim.
pub fn build_prompt(category: Category, document: &str, count: usize) -> String {
    let t = template(category);
    let mut prompt = String::with_capacity(document.len() + 4096);

    prompt.push_str("You are an expert QA UI/UX Test Engineer.\n\n");
    prompt.push_str(&format!(
        "Analyze the following BRD (Business Requirements Document) and generate EXACTLY {} \
         test cases focusing on {}.\n\n",
        count, t.headline
    ));
    prompt.push_str("BRD CONTENT:\n");
    prompt.push_str(document);
    prompt.push_str("\n\nFOCUS AREAS FOR THIS BATCH:\n");
    for (i, area) in t.focus_areas.iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", i + 1, area));
    }

    prompt.push_str("\nTEST CASE REQUIREMENTS:\n");
    for requirement in t.requirements {
        prompt.push_str(&format!("- {}\n", requirement));
    }
    prompt.push_str("- Each test case MUST include:\n");
    let fields = ["description", "steps", "expected_result", "priority"];
    for (field, hint) in fields.iter().zip(t.field_hints.iter()) {
        prompt.push_str(&format!("  * {}: {}\n", field, hint));
    }

    prompt.push_str("\nOUTPUT FORMAT - MUST be valid JSON array ONLY:\n[\n");
    prompt.push_str(t.example);
    prompt.push_str(",\n  ...\n]\n\nIMPORTANT:\n");
    prompt.push_str("- Output ONLY the JSON array, no markdown, no explanations\n");
    prompt.push_str(&format!("- Generate EXACTLY {} test cases\n", count));
    prompt.push_str("- Write the test cases in the same language as the BRD\n");
    for line in t.closing {
        prompt.push_str(&format!("- {}\n", line));
    }

    prompt
}
