use crate::import::session::Session;
use crate::model::{Condition, OptionItem};
use crate::ops::Store;
use crate::xml::accessor::text_of;
use crate::xml::node::XmlNode;

pub(crate) fn walk<S: Store>(session: &mut Session<'_, S>, root: &XmlNode) {
    for node in root.children_named("condition") {
        reconcile_condition(session, node);
    }
}

fn reconcile_condition<S: Store>(session: &mut Session<'_, S>, node: &XmlNode) {
    let identity = session.identity(node);
    let before: Option<Condition> = session.existing(&identity.uri);

    let mut condition = before.clone().unwrap_or_default();
    condition.uri = identity.uri;
    condition.uri_prefix = identity.uri_prefix;
    condition.key = identity.key;
    condition.comment = session.comment(node);
    condition.relation = text_of(node, "relation");
    condition.target_text = text_of(node, "target_text");
    condition.source = session.resolve_attribute(session.reference(node, "source"));
    condition.target_option = session.resolve::<OptionItem>(session.reference(node, "target_option"));

    let judgement = session.judge(before.as_ref(), &condition);
    session.settle(&condition, &judgement);
}
