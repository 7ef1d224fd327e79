//! Image rewrites: path fix-ups, per-format widths and numbered figures.

use super::handlers::{ElementHandler, rewrite_html};
use super::implied_end::{OpenElement, implied_close};
use folio_core::{EbookError, OutputFormat};
use lol_html::html_content::{ContentType, Element, EndTag};
use lol_html::{EndTagHandler, HandlerResult, element};
use std::cell::RefCell;
use std::rc::Rc;

/// Prefix of every figure caption.
pub const CAPTION_PREFIX: &str = "Figura ";

const PARENT_DIR: &str = "../";

/// How images of one fragment are rewritten.
#[derive(Debug, Clone)]
pub struct ImageRules {
    /// Output format selecting the width rules.
    pub format: OutputFormat,
    /// Strip one leading `../` from `src` (root chapter published from a
    /// subdirectory, or a part header attached to the root chapter).
    pub strip_parent_dir: bool,
}

impl ImageRules {
    /// Rules for `format` without path fix-ups.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            strip_parent_dir: false,
        }
    }

    /// Enables stripping of one leading `../`.
    pub fn strip_parent_dir(mut self, strip: bool) -> Self {
        self.strip_parent_dir = strip;
        self
    }

    /// Applies path and width rules to an `<img>` element.
    pub fn apply(&self, el: &mut Element<'_, '_>) -> HandlerResult {
        if self.strip_parent_dir
            && let Some(src) = el.get_attribute("src")
            && let Some(stripped) = src.strip_prefix(PARENT_DIR)
        {
            el.set_attribute("src", stripped)?;
        }
        adjust_width(el, &self.format)
    }
}

/// Width requested by the author: a `width` attribute, or a title written
/// as `width=<value>`. The flag tells whether the title carried it.
fn width_hint(el: &Element<'_, '_>) -> Option<(String, bool)> {
    if let Some(width) = el.get_attribute("width")
        && !width.trim().is_empty()
    {
        return Some((width.trim().to_string(), false));
    }

    el.get_attribute("title")
        .and_then(|title| {
            title
                .trim()
                .strip_prefix("width=")
                .map(|value| value.trim().to_string())
        })
        .filter(|value| !value.is_empty())
        .map(|value| (value, true))
}

/// Rewrites the width of an `<img>` for the output format.
///
/// PDF keeps the requested width as inline CSS. EPUB and MOBI readers get a
/// `max-width: 100%` cap on top of it. Other formats are left alone.
pub fn adjust_width(el: &mut Element<'_, '_>, format: &OutputFormat) -> HandlerResult {
    let hint = width_hint(el);
    let declaration = match format {
        OutputFormat::Pdf => hint.as_ref().map(|(width, _)| format!("width: {}", width)),
        OutputFormat::Epub | OutputFormat::Mobi => Some(match &hint {
            Some((width, _)) => format!("max-width: 100%; width: {}", width),
            None => "max-width: 100%".to_string(),
        }),
        OutputFormat::Other(_) => return Ok(()),
    };

    if let Some((_, true)) = hint {
        el.remove_attribute("title");
    }
    el.remove_attribute("width");

    if let Some(declaration) = declaration {
        let style = match el.get_attribute("style") {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{}; {}", existing.trim().trim_end_matches(';'), declaration)
            }
            _ => declaration,
        };
        el.set_attribute("style", &style)?;
    }
    Ok(())
}

/// Handlers applying [`ImageRules`] to every image in place.
pub fn image_handlers(rules: ImageRules) -> Vec<ElementHandler> {
    vec![element!("img", move |el| rules.apply(el))]
}

/// Caption text of the `index`-th (0-based) image of a chapter.
pub fn caption_text(chapter_number: i64, index: usize, alt: &str) -> String {
    format!("{}{}.{}: {}", CAPTION_PREFIX, chapter_number, index + 1, alt)
}

struct Frame {
    id: usize,
    tag: String,
    /// Figures to emit once the element is closed.
    figures: Vec<String>,
}

impl OpenElement for Frame {
    fn tag(&self) -> &str {
        &self.tag
    }
}

#[derive(Default)]
struct FigureState {
    frames: Vec<Frame>,
    next_frame: usize,
    next_index: usize,
}

impl FigureState {
    /// Closes the frames from `from` up and returns their figures, innermost
    /// element first.
    fn close_from(&mut self, from: usize) -> String {
        self.frames
            .drain(from..)
            .rev()
            .flat_map(|frame| frame.figures)
            .collect()
    }
}

/// Moves every image of `html` into a numbered figure.
///
/// Each image is removed from its parent and re-emitted right after the
/// parent closes as `<div class="figure">`, followed by a
/// `<p class="figcaption">` when the alt text is not blank. Figures of one
/// parent keep document order. An image without a parent element is
/// replaced in place.
///
/// A parent whose end tag was left out closes where the HTML parser would
/// close it: at the start tag that implies its end, at an ancestor's end
/// tag, or at the end of the fragment.
pub fn wrap_figures(
    html: &str,
    rules: ImageRules,
    chapter_number: i64,
) -> Result<String, EbookError> {
    let state = Rc::new(RefCell::new(FigureState::default()));
    let mut out = rewrite_html(html, figure_handlers(Rc::clone(&state), rules, chapter_number))?;
    out.push_str(&state.borrow_mut().close_from(0));
    Ok(out)
}

fn figure_handlers(
    state: Rc<RefCell<FigureState>>,
    rules: ImageRules,
    chapter_number: i64,
) -> Vec<ElementHandler> {
    let open = Rc::clone(&state);

    vec![
        element!("*", move |el| {
            let tag = el.tag_name();
            let mut frames = open.borrow_mut();
            if let Some(from) = implied_close(&frames.frames, &tag) {
                let figures = frames.close_from(from);
                if !figures.is_empty() {
                    el.before(&figures, ContentType::Html);
                }
            }

            if let Some(handlers) = el.end_tag_handlers() {
                let id = frames.next_frame;
                frames.next_frame += 1;
                frames.frames.push(Frame {
                    id,
                    tag,
                    figures: Vec::new(),
                });

                let open = Rc::clone(&open);
                let handler: EndTagHandler<'static> =
                    Box::new(move |end: &mut EndTag<'_>| -> HandlerResult {
                        let mut frames = open.borrow_mut();
                        let Some(position) = frames.frames.iter().position(|f| f.id == id) else {
                            return Ok(());
                        };
                        // An ancestor's end tag also closes this element.
                        if frames.frames[position].tag != end.name() {
                            let figures = frames.close_from(position);
                            if !figures.is_empty() {
                                end.before(&figures, ContentType::Html);
                            }
                            return Ok(());
                        }

                        let inner = frames.close_from(position + 1);
                        let own = frames.close_from(position);
                        if !inner.is_empty() {
                            end.before(&inner, ContentType::Html);
                        }
                        if !own.is_empty() {
                            end.after(&own, ContentType::Html);
                        }
                        Ok(())
                    });
                handlers.push(handler);
            }
            Ok(())
        }),
        element!("img", move |el| {
            rules.apply(el)?;

            let mut state = state.borrow_mut();
            let index = state.next_index;
            state.next_index += 1;
            let figure = figure_html(el, chapter_number, index);

            match state.frames.last_mut() {
                Some(frame) => {
                    frame.figures.push(figure);
                    el.remove();
                }
                None => el.replace(&figure, ContentType::Html),
            }
            Ok(())
        }),
    ]
}

fn figure_html(el: &Element<'_, '_>, chapter_number: i64, index: usize) -> String {
    let mut html = String::from("<div class=\"figure\">");
    html.push_str(&void_element_html(el));

    let alt = el.get_attribute("alt").unwrap_or_default();
    let alt = html_escape::decode_html_entities(&alt);
    let alt = alt.trim();
    if !alt.is_empty() {
        html.push_str("<p class=\"figcaption\">");
        html.push_str(&html_escape::encode_text(&caption_text(chapter_number, index, alt)));
        html.push_str("</p>");
    }

    html.push_str("</div>");
    html
}

/// Serializes a void element with its current attributes. Values are kept
/// raw, as lol_html exposes them, with only double quotes re-escaped.
fn void_element_html(el: &Element<'_, '_>) -> String {
    let mut html = format!("<{}", el.tag_name());
    for attr in el.attributes() {
        html.push(' ');
        html.push_str(&attr.name());
        html.push_str("=\"");
        html.push_str(&attr.value().replace('"', "&quot;"));
        html.push('"');
    }
    html.push('>');
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn figures(html: &str, format: OutputFormat, chapter_number: i64) -> String {
        wrap_figures(html, ImageRules::new(format), chapter_number).unwrap()
    }

    #[test]
    fn formats_caption_text() {
        assert_eq!(caption_text(4, 2, "Diagram"), "Figura 4.3: Diagram");
    }

    #[test]
    fn wraps_image_after_its_paragraph() {
        let out = figures(
            r#"<p><img src="a.png" alt="Arquitetura"></p><p>texto</p>"#,
            OutputFormat::Other("html".into()),
            2,
        );
        insta::assert_snapshot!(out, @r#"<p></p><div class="figure"><img src="a.png" alt="Arquitetura"><p class="figcaption">Figura 2.1: Arquitetura</p></div><p>texto</p>"#);
    }

    #[test]
    fn numbers_images_in_document_order() {
        let html = concat!(
            r#"<p><img src="a.png" alt="A"></p>"#,
            r#"<p><img src="b.png" alt="B"></p>"#,
            r#"<p><img src="c.png" alt="Diagram"></p>"#,
        );
        let out = figures(html, OutputFormat::Other("html".into()), 4);

        assert!(out.contains("Figura 4.1: A"));
        assert!(out.contains("Figura 4.2: B"));
        assert!(out.contains(r#"<p class="figcaption">Figura 4.3: Diagram</p>"#));
    }

    #[test]
    fn keeps_order_of_images_sharing_a_parent() {
        let out = figures(
            r#"<p><img src="a.png" alt="A"><img src="b.png" alt="B"></p>"#,
            OutputFormat::Other("html".into()),
            1,
        );
        let first = out.find("Figura 1.1: A").unwrap();
        let second = out.find("Figura 1.2: B").unwrap();
        assert!(first < second, "out: {}", out);
        assert!(out.starts_with("<p></p>"), "out: {}", out);
    }

    #[test]
    fn omits_caption_for_blank_alt() {
        let out = figures(
            r#"<p><img src="a.png" alt="  "></p><p><img src="b.png"></p>"#,
            OutputFormat::Other("html".into()),
            1,
        );
        assert!(!out.contains("figcaption"), "out: {}", out);
        assert_eq!(out.matches(r#"<div class="figure">"#).count(), 2);
    }

    #[test]
    fn escapes_caption_text() {
        let out = figures(
            r#"<p><img src="a.png" alt="A &amp; B <c>"></p>"#,
            OutputFormat::Other("html".into()),
            1,
        );
        assert!(out.contains("Figura 1.1: A &amp; B &lt;c&gt;"), "out: {}", out);
    }

    #[test]
    fn replaces_top_level_image_in_place() {
        let out = figures(r#"<img src="a.png" alt="A">"#, OutputFormat::Other("html".into()), 3);
        assert_eq!(
            out,
            r#"<div class="figure"><img src="a.png" alt="A"><p class="figcaption">Figura 3.1: A</p></div>"#
        );
    }

    #[test]
    fn paragraph_closed_by_next_paragraph_keeps_its_figure() {
        let out = figures(
            r#"<p><img src="a.png" alt="A"><p>next</p>"#,
            OutputFormat::Other("html".into()),
            1,
        );
        insta::assert_snapshot!(out, @r#"<p><div class="figure"><img src="a.png" alt="A"><p class="figcaption">Figura 1.1: A</p></div><p>next</p>"#);
    }

    #[test]
    fn list_items_without_end_tags_keep_figures_inside_the_list() {
        let out = figures(
            "<ul>\n<li><img src=\"a.png\" alt=\"A\">\n<li>b\n</ul>",
            OutputFormat::Other("html".into()),
            1,
        );
        insta::assert_snapshot!(out, @r#"
        <ul>
        <li>
        <div class="figure"><img src="a.png" alt="A"><p class="figcaption">Figura 1.1: A</p></div><li>b
        </ul>
        "#);
    }

    #[test]
    fn last_list_item_closes_before_the_list_end_tag() {
        let out = figures(
            r#"<ol><li>a<li><img src="b.png" alt="B"></ol><p>depois</p>"#,
            OutputFormat::Other("html".into()),
            5,
        );
        assert_eq!(
            out,
            r#"<ol><li>a<li><div class="figure"><img src="b.png" alt="B"><p class="figcaption">Figura 5.1: B</p></div></ol><p>depois</p>"#
        );
    }

    #[test]
    fn unclosed_parent_at_end_of_fragment_flushes_its_figure() {
        let out = figures(
            r#"<p>texto <img src="a.png" alt="Fim">"#,
            OutputFormat::Other("html".into()),
            2,
        );
        assert_eq!(
            out,
            r#"<p>texto <div class="figure"><img src="a.png" alt="Fim"><p class="figcaption">Figura 2.1: Fim</p></div>"#
        );
    }

    #[test]
    fn nested_parents_close_innermost_first() {
        let out = figures(
            r#"<div><p><img src="a.png" alt="A"></div><img src="b.png" alt="B">"#,
            OutputFormat::Other("html".into()),
            1,
        );
        assert_eq!(
            out,
            concat!(
                r#"<div><p><div class="figure"><img src="a.png" alt="A"><p class="figcaption">Figura 1.1: A</p></div></div>"#,
                r#"<div class="figure"><img src="b.png" alt="B"><p class="figcaption">Figura 1.2: B</p></div>"#,
            )
        );
    }

    #[test]
    fn strips_one_parent_dir() {
        let rules = ImageRules::new(OutputFormat::Other("html".into())).strip_parent_dir(true);
        let out = rewrite_html(
            r#"<img src="../../imagens/a.png"><img src="imagens/b.png">"#,
            image_handlers(rules),
        )
        .unwrap();
        assert_eq!(out, r#"<img src="../imagens/a.png"><img src="imagens/b.png">"#);
    }

    #[test]
    fn pdf_keeps_requested_width() {
        let out = rewrite_html(
            r#"<img src="a.png" title="width=50%"><img src="b.png" width="30%" style="border: 0;"><img src="c.png">"#,
            image_handlers(ImageRules::new(OutputFormat::Pdf)),
        )
        .unwrap();
        assert_eq!(
            out,
            r#"<img src="a.png" style="width: 50%"><img src="b.png" style="border: 0; width: 30%"><img src="c.png">"#
        );
    }

    #[test]
    fn ebook_formats_cap_width() {
        let out = rewrite_html(
            r#"<img src="a.png" title="Legenda"><img src="b.png" width="40%">"#,
            image_handlers(ImageRules::new(OutputFormat::Epub)),
        )
        .unwrap();
        assert_eq!(
            out,
            r#"<img src="a.png" title="Legenda" style="max-width: 100%"><img src="b.png" style="max-width: 100%; width: 40%">"#
        );
    }

    #[test]
    fn other_formats_are_untouched() {
        let html = r#"<img src="a.png" width="40%">"#;
        let out = rewrite_html(html, image_handlers(ImageRules::new(OutputFormat::Other("html".into()))))
            .unwrap();
        assert_eq!(out, html);
    }
}
