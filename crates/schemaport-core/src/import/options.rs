use crate::import::session::{Judgement, Session};
use crate::model::{OptionItem, OptionSet};
use crate::ops::Store;
use crate::policy::OptionDecisionPolicy;
use crate::xml::accessor::{parse_flag, parse_order, text_of};
use crate::xml::node::XmlNode;

pub(crate) fn walk<S: Store>(session: &mut Session<'_, S>, root: &XmlNode) {
    for node in root.children_named("optionset") {
        reconcile_optionset(session, node);
    }
}

fn reconcile_optionset<S: Store>(session: &mut Session<'_, S>, node: &XmlNode) {
    let identity = session.identity(node);
    let before: Option<OptionSet> = session.existing(&identity.uri);

    let mut optionset = before.clone().unwrap_or_default();
    optionset.uri = identity.uri;
    optionset.uri_prefix = identity.uri_prefix;
    optionset.key = identity.key;
    optionset.comment = session.comment(node);
    optionset.order = parse_order(&text_of(node, "order"));

    let judgement = session.judge(before.as_ref(), &optionset);
    session.settle(&optionset, &judgement);

    let options = node
        .children_named("options")
        .flat_map(|container| container.children_named("option"));
    for option_node in options {
        reconcile_option(session, option_node, &optionset, &judgement);
    }
}

fn reconcile_option<S: Store>(
    session: &mut Session<'_, S>,
    node: &XmlNode,
    optionset: &OptionSet,
    optionset_judgement: &Judgement,
) {
    let identity = session.identity(node);
    let before: Option<OptionItem> = session.existing(&identity.uri);

    let mut option = before.clone().unwrap_or_default();
    option.uri = identity.uri;
    option.uri_prefix = identity.uri_prefix;
    option.key = identity.key;
    option.comment = session.comment(node);
    option.order = parse_order(&text_of(node, "order"));
    option.text.merge(session.localized(node, "text"));
    option.additional_input = parse_flag(&text_of(node, "additional_input")).unwrap_or(false);
    option.place_under(optionset);

    let judgement = match session.policy().option_decision {
        OptionDecisionPolicy::ParentOptionSet => optionset_judgement.clone(),
        OptionDecisionPolicy::OwnFields => session.judge(before.as_ref(), &option),
    };
    session.settle(&option, &judgement);
}
