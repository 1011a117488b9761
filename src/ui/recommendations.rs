/// Recommended problems list

use patternfly_yew::prelude::{Button, ButtonVariant};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::ApiClient;
use crate::catalog::Catalog;
use crate::config::ServiceConfig;
use crate::recommendations::{
    ListAction, RecommendationList, confirm_solved_toggle, load_recommendations,
};
use crate::ui::components::{DifficultyBadge, Loading, TopicChip};

impl Reducible for RecommendationList {
    type Action = ListAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        Rc::new(next)
    }
}

#[derive(Properties, PartialEq)]
pub struct RecommendationsProps {
    pub email: AttrValue,
    pub on_profile: Callback<()>,
}

#[function_component(RecommendationsView)]
pub fn recommendations_view(props: &RecommendationsProps) -> Html {
    let list = use_reducer(RecommendationList::default);
    let loading = use_state(|| true);
    let client = use_memo((), |_| ApiClient::new(ServiceConfig::default()));

    {
        let list = list.dispatcher();
        let loading = loading.clone();
        let client = client.clone();
        let email = props.email.to_string();

        use_effect_with((), move |_| {
            spawn_local(async move {
                let catalog = Catalog::bundled();
                let top_k = client.config().top_k;
                let loaded = load_recommendations(&email, &*client, &*client, &catalog, top_k).await;
                list.dispatch(ListAction::Replace(loaded));
                loading.set(false);
            });
            || ()
        });
    }

    if *loading {
        return html! { <Loading message={Some("Loading recommendations...".to_string())} /> };
    }

    let rows = list.ranked().map(|(rank, item)| {
        let index = rank - 1;
        let on_solved = {
            let dispatcher = list.dispatcher();
            let client = client.clone();
            let email = props.email.to_string();
            let item = item.clone();

            Callback::from(move |_: MouseEvent| {
                let dispatcher = dispatcher.clone();
                let client = client.clone();
                let email = email.clone();
                let item = item.clone();
                spawn_local(async move {
                    // The label only changes once the backend agreed
                    if let Ok(solved) = confirm_solved_toggle(&*client, &email, &item).await {
                        dispatcher.dispatch(ListAction::SetSolved(index, solved));
                    }
                });
            })
        };
        let on_expand = {
            let dispatcher = list.dispatcher();
            Callback::from(move |_| dispatcher.dispatch(ListAction::ToggleExpanded(index)))
        };
        let problem = &item.problem;

        html! {
            <li class="problem-item" key={problem.title_slug.clone()}>
                <div class="problem-row">
                    <span class="problem-title" onclick={on_expand}>
                        {format!("{}. {}", rank, problem.title)}
                    </span>
                    <DifficultyBadge difficulty={problem.difficulty} />
                    <a href={problem.link.clone()} target="_blank" rel="noopener noreferrer" class="solve-link">
                        {"Solve"}
                    </a>
                    <Button onclick={on_solved} variant={solved_variant(item.solved)}>
                        {item.solved_toggle_label()}
                    </Button>
                </div>
                <div class="topic-row">
                    {for problem.topics.iter().map(|topic| html! {
                        <TopicChip topic={topic.clone()} />
                    })}
                </div>
                if item.expanded {
                    <div class="problem-statement">
                        {Html::from_html_unchecked(AttrValue::from(problem.question.clone()))}
                    </div>
                }
            </li>
        }
    });

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Recommended Problems"}</h1>

            if list.is_empty() {
                <p class="empty-text">{"No recommendations available right now."}</p>
            } else {
                <ul class="problem-list">
                    {for rows}
                </ul>
            }

            <Button onclick={props.on_profile.reform(|_| ())} variant={ButtonVariant::Secondary} block={true}>
                {"Profile"}
            </Button>
        </div>
    }
}

fn solved_variant(solved: bool) -> ButtonVariant {
    if solved { ButtonVariant::Secondary } else { ButtonVariant::Primary }
}
