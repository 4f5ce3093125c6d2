//! Domain tree
//!
//! Entities nest through `children`: nested entities first, then nested
//! attributes. A child is placed under its parent's candidate, so paths and
//! parent links are right even in a preview where nothing is stored yet.

use crate::import::session::Session;
use crate::model::{AttributeEntity, Condition, EntityKind, OptionSet, VerboseName};
use crate::ops::Store;
use crate::xml::accessor::{parse_flag, text_of};
use crate::xml::node::XmlNode;

pub(crate) fn walk<S: Store>(session: &mut Session<'_, S>, root: &XmlNode) {
    for node in root.children_named("entity") {
        reconcile_entity(session, node, None);
    }
    for node in root.children_named("attribute") {
        reconcile_attribute(session, node, None);
    }
}

fn reconcile_entity<S: Store>(
    session: &mut Session<'_, S>,
    node: &XmlNode,
    parent: Option<&AttributeEntity>,
) {
    let identity = session.identity(node);
    let parent_uri = parent.map(|p| p.uri.as_str());

    // Entities match on URI and parent
    let before = session
        .existing::<AttributeEntity>(&identity.uri)
        .filter(|stored| stored.parent.as_deref() == parent_uri);

    let mut entity = before.clone().unwrap_or_default();
    entity.uri = identity.uri;
    entity.uri_prefix = identity.uri_prefix;
    entity.key = identity.key;
    entity.comment = session.comment(node);
    entity.is_collection = parse_flag(&text_of(node, "is_collection")).unwrap_or(false);
    entity.is_attribute = false;
    entity.place_under(parent);
    entity.conditions = session.resolve_all::<Condition>(node.nested("conditions", "condition"));

    let judgement = session.judge(before.as_ref(), &entity);
    session.settle(&entity, &judgement);

    if judgement.is_valid() {
        if let Some(verbose_node) = node.child("verbosename") {
            reconcile_verbose_name(session, verbose_node, &entity);
        }
    }

    for child in node.nested("children", "entity") {
        reconcile_entity(session, child, Some(&entity));
    }
    for child in node.nested("children", "attribute") {
        reconcile_attribute(session, child, Some(&entity));
    }
}

fn reconcile_attribute<S: Store>(
    session: &mut Session<'_, S>,
    node: &XmlNode,
    parent: Option<&AttributeEntity>,
) {
    let identity = session.identity(node);
    let before = session.existing::<AttributeEntity>(&identity.uri);

    let mut attribute = before.clone().unwrap_or_default();
    attribute.uri = identity.uri;
    attribute.uri_prefix = identity.uri_prefix;
    attribute.key = identity.key;
    attribute.comment = session.comment(node);
    attribute.is_collection = parse_flag(&text_of(node, "is_collection")).unwrap_or(false);
    attribute.is_attribute = true;
    attribute.value_type = text_of(node, "value_type");
    attribute.unit = text_of(node, "unit");
    attribute.place_under(parent);
    attribute.optionsets = session.resolve_all::<OptionSet>(node.nested("optionsets", "optionset"));
    attribute.conditions = session.resolve_all::<Condition>(node.nested("conditions", "condition"));

    let judgement = session.judge(before.as_ref(), &attribute);
    session.settle(&attribute, &judgement);

    if judgement.is_valid() {
        if let Some(verbose_node) = node.child("verbosename") {
            reconcile_verbose_name(session, verbose_node, &attribute);
        }
    }
}

/// Matched by owner; written outside the ledger
fn reconcile_verbose_name<S: Store>(
    session: &mut Session<'_, S>,
    node: &XmlNode,
    owner: &AttributeEntity,
) {
    let mut verbose_name = session
        .existing::<VerboseName>(&owner.uri)
        .unwrap_or_else(|| VerboseName::for_owner(&owner.uri));
    verbose_name.name.merge(session.localized(node, "name"));
    verbose_name
        .name_plural
        .merge(session.localized(node, "name_plural"));

    session.save_sub_record(EntityKind::AttributeEntity, &verbose_name);
}
