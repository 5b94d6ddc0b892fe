use corpus::metadata::{self, MetadataError};

const ARTICLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<article xmlns:xlink="http://www.w3.org/1999/xlink" article-type="research-article">
  <front>
    <article-meta>
      <article-id pub-id-type="publisher-id">elife-00001</article-id>
      <article-id pub-id-type="doi">10.7554/eLife.00001</article-id>
      <title-group>
        <article-title>Growth of <italic>E. coli</italic> under stress</article-title>
      </title-group>
      <contrib-group>
        <contrib contrib-type="author"><name><surname>Harvey</surname><given-names>Ada</given-names></name></contrib>
        <contrib contrib-type="author"><name><surname>Okafor</surname><given-names>Chidi</given-names></name></contrib>
        <contrib contrib-type="author"><collab>The Microbiome Consortium</collab></contrib>
      </contrib-group>
      <pub-date publication-format="electronic"><day>02</day><month>03</month><year>2016</year></pub-date>
      <abstract><p>Stress slows growth of <italic>E. coli</italic> cultures.</p></abstract>
      <permissions>
        <license xlink:href="http://creativecommons.org/licenses/by/4.0/"><license-p>CC-BY</license-p></license>
      </permissions>
    </article-meta>
  </front>
  <body><p>Full text.</p></body>
</article>
"#;

#[test]
fn extracts_all_fields() {
    let record = metadata::normalize(ARTICLE).unwrap();

    assert_eq!(record.title, "Growth of E. coli under stress");
    assert_eq!(record.path, "elife-00001");

    assert_eq!(record.author.len(), 2);
    assert_eq!(record.author[0].surname, "Harvey");
    assert_eq!(record.author[0].given_names, "Ada");

    assert_eq!(record.identifier.len(), 2);
    assert_eq!(record.identifier[1].id_type, "doi");
    assert_eq!(record.identifier[1].id, "10.7554/eLife.00001");

    assert_eq!(record.date.day, "02");
    assert_eq!(record.date.month, "03");
    assert_eq!(record.date.year, "2016");

    assert_eq!(
        record.license.as_deref(),
        Some("http://creativecommons.org/licenses/by/4.0/")
    );
}

#[test]
fn abstract_rewraps_inline_markup_single_level() {
    let record = metadata::normalize(ARTICLE).unwrap();
    assert_eq!(
        record.abstract_text.as_deref(),
        Some("Stress slows growth of <italic>E. coli</italic> cultures.")
    );
}

#[test]
fn group_authors_are_dropped() {
    let record = metadata::normalize(ARTICLE).unwrap();
    assert!(record.author.iter().all(|a| a.surname != "The Microbiome Consortium"));
}

#[test]
fn missing_abstract_is_absent_not_empty() {
    let xml = ARTICLE.replace(
        "<abstract><p>Stress slows growth of <italic>E. coli</italic> cultures.</p></abstract>",
        "",
    );
    let record = metadata::normalize(&xml).unwrap();
    assert!(record.abstract_text.is_none());
}

#[test]
fn missing_publisher_id_is_a_typed_error() {
    let xml = ARTICLE.replace("publisher-id", "other-id");
    let err = metadata::normalize(&xml).unwrap_err();
    assert!(matches!(err, MetadataError::MissingPublisherId));
}

#[test]
fn non_article_root_is_a_typed_error() {
    let err = metadata::normalize("<book><front/></book>").unwrap_err();
    assert!(matches!(err, MetadataError::NotAnArticle(name) if name == "book"));
}

#[test]
fn malformed_xml_is_a_parse_error() {
    let err = metadata::normalize("<article><front>").unwrap_err();
    assert!(matches!(err, MetadataError::Parse(_)));
}

#[test]
fn missing_license_is_absent() {
    let xml = ARTICLE.replace(
        r#"<license xlink:href="http://creativecommons.org/licenses/by/4.0/"><license-p>CC-BY</license-p></license>"#,
        "",
    );
    let record = metadata::normalize(&xml).unwrap();
    assert!(record.license.is_none());
}
