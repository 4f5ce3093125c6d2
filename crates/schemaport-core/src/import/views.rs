use crate::import::session::Session;
use crate::model::View;
use crate::ops::Store;
use crate::policy::ViewWalkPolicy;
use crate::xml::node::XmlNode;

pub(crate) fn walk<S: Store>(session: &mut Session<'_, S>, root: &XmlNode) {
    for node in root.children_named("view") {
        let valid = reconcile_view(session, node);
        if valid && session.policy().view_walk == ViewWalkPolicy::FirstValid {
            tracing::debug!("first valid view reconciled, walk ends");
            break;
        }
    }
}

fn reconcile_view<S: Store>(session: &mut Session<'_, S>, node: &XmlNode) -> bool {
    let identity = session.identity(node);
    let before: Option<View> = session.existing(&identity.uri);

    let mut view = before.clone().unwrap_or_default();
    view.uri = identity.uri;
    view.uri_prefix = identity.uri_prefix;
    view.key = identity.key;
    view.comment = session.comment(node);
    view.title.merge(session.localized(node, "title"));
    view.help.merge(session.localized(node, "help"));

    let judgement = session.judge(before.as_ref(), &view);
    session.settle(&view, &judgement);
    judgement.is_valid()
}
