use std::collections::HashMap;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

use crate::error::{Error, Result};
use crate::section::{Part, PartCounts, SectionBounds};
use crate::style::Style;
use crate::text::{self, Piece};

pub fn window() -> Result<Window> {
    web_sys::window().ok_or(Error::NoWindow)
}

pub fn document() -> Result<Document> {
    window()?.document().ok_or(Error::NoWindow)
}

pub fn query(root: &Element, selector: &str) -> Option<HtmlElement> {
    root.query_selector(selector).ok().flatten()?.dyn_into().ok()
}

pub fn query_all(root: &Element, selector: &str) -> Vec<HtmlElement> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

pub fn viewport(window: &Window) -> (f32, f32) {
    let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (w as f32, h as f32)
}

pub fn document_height(document: &Document) -> f32 {
    document.document_element().map(|el| el.scroll_height() as f32).unwrap_or(0.0)
}

/// Element edges in document px given the current scroll offset.
pub fn bounds(el: &Element, scroll_y: f32) -> SectionBounds {
    let rect = el.get_bounding_client_rect();
    SectionBounds {
        top: rect.top() as f32 + scroll_y,
        bottom: rect.bottom() as f32 + scroll_y,
    }
}

/// Like [`bounds`], but with the element's own inline transform lifted for
/// the measurement so exit-scrub lift and shrink do not move the lines.
pub fn layout_bounds(el: &HtmlElement, scroll_y: f32) -> SectionBounds {
    let css = el.style();
    let transform = css.get_property_value("transform").unwrap_or_default();
    if transform.is_empty() || transform == "none" {
        return bounds(el, scroll_y);
    }
    let _ = css.set_property("transform", "none");
    let measured = bounds(el, scroll_y);
    let _ = css.set_property("transform", &transform);
    measured
}

pub fn write_style(el: &HtmlElement, style: &Style, with_filter: bool) {
    let css = el.style();
    let _ = css.set_property("transform", &style.transform_css());
    let _ = css.set_property("opacity", &style.opacity_css());
    if with_filter {
        let _ = css.set_property("filter", &style.filter_css());
    }
}

/// Replaces the text of `el` with spans for the animated pieces.
fn split_into_spans(document: &Document, el: &HtmlElement, pieces: &[Piece<'_>], class: &str) -> Vec<HtmlElement> {
    el.set_text_content(None);
    let mut spans = Vec::new();
    for piece in pieces {
        if !piece.animated {
            let _ = el.append_child(&document.create_text_node(piece.text));
            continue;
        }
        let Ok(span) = document.create_element("span") else {
            continue;
        };
        span.set_class_name(class);
        span.set_text_content(Some(piece.text));
        if let Ok(span) = span.dyn_into::<HtmlElement>() {
            let _ = span.style().set_property("display", "inline-block");
            let _ = el.append_child(&span);
            spans.push(span);
        }
    }
    spans
}

/// DOM handles of one `[data-section]`.
pub struct SectionDom {
    pub root: HtmlElement,
    pub feature: bool,
    container: HtmlElement,
    chars: Vec<HtmlElement>,
    cards: Vec<HtmlElement>,
    words: Vec<HtmlElement>,
    list_items: Vec<HtmlElement>,
    written: HashMap<Part, Style>,
    exit_written: Option<Style>,
}

impl SectionDom {
    /// Collects the animated children and splits heading/paragraph text.
    pub fn build(document: &Document, root: HtmlElement) -> Self {
        let container = query(&root, ".section-content").unwrap_or_else(|| root.clone());
        let mut chars = Vec::new();
        for heading in query_all(&container, "h1, h2") {
            let content = heading.text_content().unwrap_or_default();
            chars.extend(split_into_spans(document, &heading, &text::split_chars(&content), "char"));
        }
        let mut words = Vec::new();
        for para in query_all(&container, "p") {
            let content = para.text_content().unwrap_or_default();
            words.extend(split_into_spans(document, &para, &text::split_words(&content), "word"));
        }
        let cards = query_all(&container, "[data-card]");
        let list_items = query_all(&container, "li");
        let feature = root.has_attribute("data-feature");
        Self {
            root,
            feature,
            container,
            chars,
            cards,
            words,
            list_items,
            written: HashMap::new(),
            exit_written: None,
        }
    }

    pub fn name(&self) -> String {
        self.root.get_attribute("data-section").filter(|s| !s.is_empty()).unwrap_or_else(|| self.root.id())
    }

    pub fn counts(&self) -> PartCounts {
        let n = |v: &Vec<HtmlElement>| v.len().min(u16::MAX as usize) as u16;
        PartCounts {
            chars: n(&self.chars),
            cards: n(&self.cards),
            words: n(&self.words),
            list_items: n(&self.list_items),
        }
    }

    fn element(&self, part: Part) -> Option<&HtmlElement> {
        match part {
            Part::Container => Some(&self.container),
            Part::HeadingChar(i) => self.chars.get(i as usize),
            Part::Card(i) => self.cards.get(i as usize),
            Part::Word(i) => self.words.get(i as usize),
            Part::ListItem(i) => self.list_items.get(i as usize),
        }
    }

    /// Writes entry styles that changed since the last frame.
    pub fn write_entry(&mut self, styles: impl Iterator<Item = (Part, Style)>) {
        for (part, style) in styles {
            if self.written.get(&part) == Some(&style) {
                continue;
            }
            if let Some(el) = self.element(part) {
                write_style(el, &style, false);
            }
            self.written.insert(part, style);
        }
    }

    pub fn write_exit(&mut self, style: Style) {
        if self.exit_written == Some(style) {
            return;
        }
        write_style(&self.root, &style, true);
        self.exit_written = Some(style);
    }
}
