//! Question catalog
//!
//! The document root is the catalog itself. Within a subsection's
//! `entities`, question sets are visited before direct questions.

use crate::import::session::Session;
use crate::model::{AttributeEntity, Catalog, Question, QuestionSet, Section, Subsection};
use crate::ops::Store;
use crate::xml::accessor::{parse_order, text_of};
use crate::xml::node::XmlNode;

pub(crate) fn walk<S: Store>(session: &mut Session<'_, S>, root: &XmlNode) {
    reconcile_catalog(session, root);
}

fn reconcile_catalog<S: Store>(session: &mut Session<'_, S>, node: &XmlNode) {
    let identity = session.identity(node);
    let before: Option<Catalog> = session.existing(&identity.uri);

    let mut catalog = before.clone().unwrap_or_default();
    catalog.uri = identity.uri;
    catalog.uri_prefix = identity.uri_prefix;
    catalog.key = identity.key;
    catalog.comment = session.comment(node);
    catalog.order = parse_order(&text_of(node, "order"));
    catalog.title.merge(session.localized(node, "title"));

    let judgement = session.judge(before.as_ref(), &catalog);
    session.settle(&catalog, &judgement);

    for section_node in node.nested("sections", "section") {
        reconcile_section(session, section_node, &catalog);
    }
}

fn reconcile_section<S: Store>(session: &mut Session<'_, S>, node: &XmlNode, catalog: &Catalog) {
    let identity = session.identity(node);
    let before: Option<Section> = session.existing(&identity.uri);

    let mut section = before.clone().unwrap_or_default();
    section.uri = identity.uri;
    section.uri_prefix = identity.uri_prefix;
    section.key = identity.key;
    section.comment = session.comment(node);
    section.order = parse_order(&text_of(node, "order"));
    section.title.merge(session.localized(node, "title"));
    section.place_under(catalog);

    let judgement = session.judge(before.as_ref(), &section);
    session.settle(&section, &judgement);

    for subsection_node in node.nested("subsections", "subsection") {
        reconcile_subsection(session, subsection_node, &section);
    }
}

fn reconcile_subsection<S: Store>(session: &mut Session<'_, S>, node: &XmlNode, section: &Section) {
    let identity = session.identity(node);
    let before: Option<Subsection> = session.existing(&identity.uri);

    let mut subsection = before.clone().unwrap_or_default();
    subsection.uri = identity.uri;
    subsection.uri_prefix = identity.uri_prefix;
    subsection.key = identity.key;
    subsection.comment = session.comment(node);
    subsection.order = parse_order(&text_of(node, "order"));
    subsection.title.merge(session.localized(node, "title"));
    subsection.place_under(section);

    let judgement = session.judge(before.as_ref(), &subsection);
    session.settle(&subsection, &judgement);

    for questionset_node in node.nested("entities", "questionset") {
        reconcile_questionset(session, questionset_node, &subsection);
    }
    for question_node in node.nested("entities", "question") {
        reconcile_question(session, question_node, &subsection, None);
    }
}

fn reconcile_questionset<S: Store>(
    session: &mut Session<'_, S>,
    node: &XmlNode,
    subsection: &Subsection,
) {
    let identity = session.identity(node);
    let before: Option<QuestionSet> = session.existing(&identity.uri);

    let mut questionset = before.clone().unwrap_or_default();
    questionset.uri = identity.uri;
    questionset.uri_prefix = identity.uri_prefix;
    questionset.key = identity.key;
    questionset.comment = session.comment(node);
    questionset.order = parse_order(&text_of(node, "order"));
    questionset.help.merge(session.localized(node, "help"));
    questionset.attribute_entity =
        session.resolve::<AttributeEntity>(session.reference(node, "attribute_entity"));
    questionset.place_under(subsection);

    let judgement = session.judge(before.as_ref(), &questionset);
    session.settle(&questionset, &judgement);

    for question_node in node.nested("questions", "question") {
        reconcile_question(session, question_node, subsection, Some(&questionset));
    }
}

fn reconcile_question<S: Store>(
    session: &mut Session<'_, S>,
    node: &XmlNode,
    subsection: &Subsection,
    questionset: Option<&QuestionSet>,
) {
    let identity = session.identity(node);
    let before: Option<Question> = session.existing(&identity.uri);

    let mut question = before.clone().unwrap_or_default();
    question.uri = identity.uri;
    question.uri_prefix = identity.uri_prefix;
    question.key = identity.key;
    question.comment = session.comment(node);
    question.order = parse_order(&text_of(node, "order"));
    question.widget_type = text_of(node, "widget_type");
    question.text.merge(session.localized(node, "text"));
    question.help.merge(session.localized(node, "help"));
    question.attribute_entity =
        session.resolve::<AttributeEntity>(session.reference(node, "attribute_entity"));
    question.place_under(subsection, questionset);

    let judgement = session.judge(before.as_ref(), &question);
    session.settle(&question, &judgement);
}
