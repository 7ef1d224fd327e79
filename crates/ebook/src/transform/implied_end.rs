//! Elements closed by a start tag when their own end tag was left out.
//!
//! lol_html keeps no tree: an omitted `</p>` or `</li>` is never reported,
//! and a later end tag pops every element above its nearest namesake. The
//! streaming rewrites track their own open elements and use these rules,
//! a subset of the HTML tree builder's, to notice the omitted end tags.

/// Elements delimiting the scope searched for an open element.
const SCOPE_BOUNDARY: &[&str] = &[
    "applet", "button", "caption", "html", "marquee", "object", "table", "td", "template", "th",
];

/// Start tags that close an open `<p>`.
const CLOSES_PARAGRAPH: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "dd", "details", "dialog", "dir", "div",
    "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hgroup", "hr", "li", "listing", "main", "menu", "nav", "ol", "p", "plaintext",
    "pre", "section", "summary", "table", "ul", "xmp",
];

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Whether a `tag` start tag ends an open paragraph. These are the block
/// elements that cannot sit inside phrasing content.
pub fn closes_paragraph(tag: &str) -> bool {
    CLOSES_PARAGRAPH.contains(&tag)
}

/// An element on a rewrite's own stack of open elements.
pub trait OpenElement {
    /// Lowercase tag name.
    fn tag(&self) -> &str;
}

impl OpenElement for &str {
    fn tag(&self) -> &str {
        self
    }
}

/// Index of the outermost open element that a `tag` start tag closes.
///
/// `open` lists the open elements, outermost first. Everything from the
/// returned index up is closed.
pub fn implied_close<T: OpenElement>(open: &[T], tag: &str) -> Option<usize> {
    let item = match tag {
        "li" => find_open(open, &["li"], &["ol", "ul"]),
        "dd" | "dt" => find_open(open, &["dd", "dt"], &["dl"]),
        _ => None,
    };
    let paragraph = if closes_paragraph(tag) {
        find_open(open, &["p"], &[])
    } else {
        None
    };
    let heading = match open.last() {
        Some(current) if HEADINGS.contains(&tag) && HEADINGS.contains(&current.tag()) => {
            Some(open.len() - 1)
        }
        _ => None,
    };

    item.into_iter().chain(paragraph).chain(heading).min()
}

fn find_open<T: OpenElement>(open: &[T], targets: &[&str], stops: &[&str]) -> Option<usize> {
    for (index, element) in open.iter().enumerate().rev() {
        let tag = element.tag();
        if targets.contains(&tag) {
            return Some(index);
        }
        if stops.contains(&tag) || SCOPE_BOUNDARY.contains(&tag) {
            return None;
        }
    }
    None
}
