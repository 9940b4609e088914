//! Synthetic PDFs built with lopdf.

#![allow(dead_code)]

use lopdf::{dictionary, Document, Object, Stream};

/// A requirement document long enough to pass extraction.
pub const LOGIN_BRD: &[&str] = &[
    "Login page. The screen shows an email field, a password field and a Sign in button.",
    "Valid credentials open the dashboard and show the user name in the top bar.",
    "Invalid credentials keep the user on the login page and show an inline error message.",
];

/// Builds a PDF with one page per entry, each a single line of Courier text.
pub fn build_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for text in pages {
        let content = format!("BT /F1 11 Tf 40 720 Td ({}) Tj ET", text);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        kids.push(Object::from(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("Failed to serialize PDF");
    bytes
}
