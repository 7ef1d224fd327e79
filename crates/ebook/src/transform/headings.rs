//! Heading rewrites: numbered level-2 sections and title extraction.

use super::handlers::{ElementHandler, rewrite_html};
use super::implied_end::closes_paragraph;
use folio_core::{EbookError, SectionRef};
use lol_html::html_content::{ContentType, EndTag};
use lol_html::{EndTagHandler, HandlerResult, element, text};
use std::cell::RefCell;
use std::rc::Rc;

/// Numbered title of the `index`-th (0-based) section of a chapter.
pub fn section_title(chapter_number: i64, index: usize, text: &str) -> String {
    format!("{}.{} {}", chapter_number, index + 1, text)
}

struct OpenHeading {
    index: usize,
    id: Option<String>,
    /// Raw text seen so far, entities still encoded.
    text: String,
}

struct NumberingState {
    chapter_number: i64,
    started: usize,
    open: Option<OpenHeading>,
    sections: Vec<SectionRef>,
}

impl NumberingState {
    fn new(chapter_number: i64) -> Self {
        Self {
            chapter_number,
            started: 0,
            open: None,
            sections: Vec::new(),
        }
    }

    /// Records the open heading, if any.
    fn close(&mut self) {
        if let Some(heading) = self.open.take() {
            let text = html_escape::decode_html_entities(&heading.text);
            self.sections.push(SectionRef {
                title: section_title(self.chapter_number, heading.index, &text),
                id: heading.id,
            });
        }
    }
}

/// Rewrites every `<h2>` of `html` to `"<n>.<i> <text>"`.
///
/// Inline markup nested inside a heading is flattened to its text. A
/// heading left without its end tag ends at the first block element or
/// heading inside it. Returns the rewritten HTML and the numbered sections
/// in document order.
pub fn number_sections(
    html: &str,
    chapter_number: i64,
) -> Result<(String, Vec<SectionRef>), EbookError> {
    let state = Rc::new(RefCell::new(NumberingState::new(chapter_number)));
    let rewritten = rewrite_html(html, numbering_handlers(Rc::clone(&state)))?;

    let mut state = state.borrow_mut();
    state.close();
    Ok((rewritten, std::mem::take(&mut state.sections)))
}

fn numbering_handlers(state: Rc<RefCell<NumberingState>>) -> Vec<ElementHandler> {
    let nested = Rc::clone(&state);
    let texts = Rc::clone(&state);
    let headings = state;

    vec![
        element!("h2 *", move |el| {
            let tag = el.tag_name();
            let mut state = nested.borrow_mut();
            if state.open.is_none() || tag == "h2" {
                return Ok(());
            }
            if closes_paragraph(&tag) {
                state.close();
            } else {
                el.remove_and_keep_content();
            }
            Ok(())
        }),
        element!("h2", move |el| {
            let mut state = headings.borrow_mut();
            state.close();

            let index = state.started;
            state.started += 1;
            el.prepend(&section_title(state.chapter_number, index, ""), ContentType::Text);
            state.open = Some(OpenHeading {
                index,
                id: el.get_attribute("id"),
                text: String::new(),
            });

            if let Some(handlers) = el.end_tag_handlers() {
                let headings = Rc::clone(&headings);
                let handler: EndTagHandler<'static> =
                    Box::new(move |_end: &mut EndTag<'_>| -> HandlerResult {
                        let mut state = headings.borrow_mut();
                        if state.open.as_ref().is_some_and(|open| open.index == index) {
                            state.close();
                        }
                        Ok(())
                    });
                handlers.push(handler);
            }
            Ok(())
        }),
        text!("h2", move |chunk| {
            if let Some(heading) = texts.borrow_mut().open.as_mut() {
                heading.text.push_str(chunk.as_str());
            }
            Ok(())
        }),
    ]
}

/// Text of the first element matching `selector`, entities decoded.
pub fn first_heading_text(html: &str, selector: &str) -> Result<Option<String>, EbookError> {
    #[derive(Default)]
    struct Capture {
        text: String,
        seen: usize,
    }

    let capture = Rc::new(RefCell::new(Capture::default()));
    let starts = Rc::clone(&capture);
    let texts = Rc::clone(&capture);
    let selector = selector.to_string();

    rewrite_html(
        html,
        vec![
            element!(selector.as_str(), move |_el| {
                starts.borrow_mut().seen += 1;
                Ok(())
            }),
            text!(selector.as_str(), move |chunk| {
                let mut capture = texts.borrow_mut();
                if capture.seen == 1 {
                    capture.text.push_str(chunk.as_str());
                }
                Ok(())
            }),
        ],
    )?;

    let capture = capture.borrow();
    if capture.seen == 0 {
        return Ok(None);
    }
    Ok(Some(
        html_escape::decode_html_entities(&capture.text).into_owned(),
    ))
}

/// Removes the first element matching `selector`, content included.
pub fn remove_first(html: &str, selector: &str) -> Result<String, EbookError> {
    let mut removed = false;
    let selector = selector.to_string();
    rewrite_html(
        html,
        vec![element!(selector.as_str(), move |el| {
            if !removed {
                el.remove();
                removed = true;
            }
            Ok(())
        })],
    )
}
