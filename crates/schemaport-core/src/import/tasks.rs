use crate::import::session::Session;
use crate::model::{EntityKind, Task, TimeFrame};
use crate::ops::Store;
use crate::xml::accessor::{parse_count, text_of};
use crate::xml::node::XmlNode;

pub(crate) fn walk<S: Store>(session: &mut Session<'_, S>, root: &XmlNode) {
    for node in root.children_named("task") {
        reconcile_task(session, node);
    }
}

fn reconcile_task<S: Store>(session: &mut Session<'_, S>, node: &XmlNode) {
    let identity = session.identity(node);
    let before: Option<Task> = session.existing(&identity.uri);

    let mut task = before.clone().unwrap_or_default();
    task.uri = identity.uri;
    task.uri_prefix = identity.uri_prefix;
    task.key = identity.key;
    task.comment = session.comment(node);
    task.attribute = session.resolve_attribute(session.reference(node, "attribute"));
    task.title.merge(session.localized(node, "title"));
    task.text.merge(session.localized(node, "text"));

    let judgement = session.judge(before.as_ref(), &task);
    session.settle(&task, &judgement);

    // A rejected task leaves its stored time frame alone
    if !judgement.is_valid() {
        return;
    }
    if let Some(timeframe_node) = node.child("timeframe") {
        reconcile_timeframe(session, timeframe_node, &task);
    }
}

/// Matched by task. Attribute references that do not resolve keep the
/// stored value; day offsets are taken only when they are plain digits, and
/// the record is written only if at least one of them was.
fn reconcile_timeframe<S: Store>(session: &mut Session<'_, S>, node: &XmlNode, task: &Task) {
    let mut timeframe = session
        .existing::<TimeFrame>(&task.uri)
        .unwrap_or_else(|| TimeFrame::for_task(&task.uri));

    if let Some(uri) = session.resolve_attribute(session.reference(node, "start_attribute")) {
        timeframe.start_attribute = Some(uri);
    }
    if let Some(uri) = session.resolve_attribute(session.reference(node, "end_attribute")) {
        timeframe.end_attribute = Some(uri);
    }

    let mut well_formed = false;
    if let Some(days) = parse_count(&text_of(node, "days_before")) {
        timeframe.days_before = Some(days);
        well_formed = true;
    }
    if let Some(days) = parse_count(&text_of(node, "days_after")) {
        timeframe.days_after = Some(days);
        well_formed = true;
    }

    if !well_formed {
        tracing::debug!(uri = %task.uri, "time frame has no usable day offsets, not saved");
        return;
    }
    session.save_sub_record(EntityKind::Task, &timeframe);
}
