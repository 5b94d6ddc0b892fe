//! Turns a parsed article tree into a normalized bibliographic record.
//!
//! The source schema is the fixed JATS-like layout the corpus uses:
//! everything of interest sits under `article/front/article-meta`.

use thiserror::Error;

use crate::record::{Author, BibRecord, Identifier, PubDate};
use crate::xml::{self, Element, Node};

/// Per-document failures. All of these are recoverable at batch level:
/// the document is logged and skipped, the run continues.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("malformed XML: {0}")]
    Parse(String),
    #[error("document root is <{0}>, not <article>")]
    NotAnArticle(String),
    #[error("missing element <{0}>")]
    MissingElement(&'static str),
    #[error("no identifier of type publisher-id")]
    MissingPublisherId,
}

/// Normalize raw article XML into a bibliographic record.
pub fn normalize(xml: &str) -> Result<BibRecord, MetadataError> {
    let root = xml::parse(xml).map_err(|e| MetadataError::Parse(e.to_string()))?;
    from_tree(&root)
}

/// Total mapping from an already-parsed tree to a record.
pub fn from_tree(root: &Element) -> Result<BibRecord, MetadataError> {
    if root.name != "article" {
        return Err(MetadataError::NotAnArticle(root.name.clone()));
    }
    let meta = root
        .child("front")
        .ok_or(MetadataError::MissingElement("front"))?
        .child("article-meta")
        .ok_or(MetadataError::MissingElement("article-meta"))?;

    let identifier = parse_identifiers(meta);
    let path = identifier
        .iter()
        .find(|id| id.id_type == "publisher-id")
        .map(|id| id.id.clone())
        .ok_or(MetadataError::MissingPublisherId)?;

    Ok(BibRecord {
        title: parse_title(meta)?,
        author: parse_authors(meta),
        abstract_text: parse_abstract(meta),
        identifier,
        date: parse_date(meta)?,
        license: parse_license(meta),
        path,
    })
}

fn parse_title(meta: &Element) -> Result<String, MetadataError> {
    let title = meta
        .child("title-group")
        .ok_or(MetadataError::MissingElement("title-group"))?
        .child("article-title")
        .ok_or(MetadataError::MissingElement("article-title"))?;
    // Inline markup inside the title collapses to its text content.
    Ok(title.text())
}

/// Contributors without a structured <name> child, such as group
/// authors, are silently dropped.
fn parse_authors(meta: &Element) -> Vec<Author> {
    let Some(group) = meta.child("contrib-group") else {
        return Vec::new();
    };
    group
        .children_named("contrib")
        .filter_map(|contrib| {
            let name = contrib.child("name")?;
            Some(Author {
                surname: name.child("surname")?.text(),
                given_names: name.child("given-names")?.text(),
            })
        })
        .collect()
}

/// Rebuild the first abstract paragraph as a string: text runs pass
/// through, named children are re-wrapped as a minimal open/close tag
/// pair around their text. Only single-level children are handled;
/// deeper nesting collapses into the child's text.
fn parse_abstract(meta: &Element) -> Option<String> {
    let paragraph = meta.child("abstract")?.child("p")?;
    let mut out = String::new();
    for node in &paragraph.children {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => {
                out.push('<');
                out.push_str(&e.name);
                out.push('>');
                out.push_str(&e.text());
                out.push_str("</");
                out.push_str(&e.name);
                out.push('>');
            }
        }
    }
    Some(out)
}

fn parse_identifiers(meta: &Element) -> Vec<Identifier> {
    meta.children_named("article-id")
        .map(|id| Identifier {
            id_type: id.attr("pub-id-type").unwrap_or_default().to_string(),
            id: id.text(),
        })
        .collect()
}

/// First publication date, day/month/year verbatim.
fn parse_date(meta: &Element) -> Result<PubDate, MetadataError> {
    let date = meta
        .child("pub-date")
        .ok_or(MetadataError::MissingElement("pub-date"))?;
    let field = |name: &'static str| {
        date.child(name)
            .map(|e| e.text())
            .ok_or(MetadataError::MissingElement(name))
    };
    Ok(PubDate {
        day: field("day")?,
        month: field("month")?,
        year: field("year")?,
    })
}

fn parse_license(meta: &Element) -> Option<String> {
    meta.child("permissions")?
        .child("license")?
        .attr("xlink:href")
        .map(str::to_string)
}
