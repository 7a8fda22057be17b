//! A representative page used by the CLI and tests

use super::Document;

/// Build a page with the elements theming cares about: navigation, headings,
/// cards, images, buttons, links, a code block and a footer.
pub fn sample_page(url: &str) -> Document {
    let mut doc = Document::new(url);
    let body = doc.body();

    let title = doc.create_element("title");
    doc.set_text(title, "Sample page");
    doc.append_child(doc.head(), title);

    let nav = doc.create_element("nav");
    doc.append_child(body, nav);
    for label in ["Home", "About"] {
        let link = doc.create_element("a");
        doc.set_attribute(link, "href", "#");
        doc.set_text(link, label);
        doc.append_child(nav, link);
    }

    let main = doc.create_element("main");
    doc.set_id(main, "main");
    doc.append_child(body, main);

    let h1 = doc.create_element("h1");
    doc.set_text(h1, "Welcome");
    doc.append_child(main, h1);

    for (heading, caption) in [("Latest", "First card"), ("Archive", "Second card")] {
        let card = doc.create_element("div");
        doc.add_class(card, "card");
        doc.append_child(main, card);

        let h2 = doc.create_element("h2");
        doc.set_text(h2, heading);
        doc.append_child(card, h2);

        let img = doc.create_element("img");
        doc.set_attribute(img, "alt", caption);
        doc.append_child(card, img);
    }

    let button = doc.create_element("button");
    doc.set_text(button, "Subscribe");
    doc.append_child(main, button);

    let pre = doc.create_element("pre");
    doc.set_text(pre, "fn main() {}");
    doc.append_child(main, pre);

    let footer = doc.create_element("footer");
    doc.set_text(footer, "(c) Sample");
    doc.append_child(body, footer);

    doc
}
