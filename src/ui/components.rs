/// Reusable UI components

use yew::prelude::*;

use crate::api::SolvedCounts;
use crate::catalog::Difficulty;
use crate::profile::{Notification, NotificationKind};

#[derive(Properties, PartialEq)]
pub struct DifficultyBadgeProps {
    pub difficulty: Difficulty,
}

#[function_component(DifficultyBadge)]
pub fn difficulty_badge(props: &DifficultyBadgeProps) -> Html {
    let color = match props.difficulty {
        Difficulty::Easy => "#4caf50",
        Difficulty::Medium => "#ff9800",
        Difficulty::Hard => "#f44336",
    };

    html! {
        <span class="badge" style={format!("background-color: {}; color: white; padding: 2px 8px; border-radius: 4px; font-size: 12px; font-weight: 600;", color)}>
            {props.difficulty.label()}
        </span>
    }
}

#[derive(Properties, PartialEq)]
pub struct TopicChipProps {
    pub topic: AttrValue,
}

#[function_component(TopicChip)]
pub fn topic_chip(props: &TopicChipProps) -> Html {
    html! {
        <span class="topic-chip">{props.topic.clone()}</span>
    }
}

#[derive(Properties, PartialEq)]
pub struct SolvedStatsProps {
    pub solved: SolvedCounts,
}

#[function_component(SolvedStats)]
pub fn solved_stats(props: &SolvedStatsProps) -> Html {
    let cells = [
        ("Easy", props.solved.easy, "#e8f5e9", "#2e7d32"),
        ("Medium", props.solved.medium, "#fff8e1", "#f57f17"),
        ("Hard", props.solved.hard, "#ffebee", "#c62828"),
    ];

    html! {
        <div class="solved-grid">
            {for cells.iter().map(|(label, count, bg, fg)| html! {
                <div class="solved-cell" style={format!("background-color: {}; color: {};", bg, fg)}>
                    <p class="solved-label">{*label}</p>
                    <p class="solved-count">{*count}</p>
                </div>
            })}
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ToastProps {
    pub notification: Notification,
}

#[function_component(Toast)]
pub fn toast(props: &ToastProps) -> Html {
    let bg_color = match props.notification.kind {
        NotificationKind::Success => "#4caf50",
        NotificationKind::Error => "#f44336",
    };

    html! {
        <div class="toast" style={format!("background-color: {}; color: white; padding: 12px; border-radius: 4px; margin: 10px 0;", bg_color)}>
            {&props.notification.message}
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct LoadingProps {
    #[prop_or_default]
    pub message: Option<String>,
}

#[function_component(Loading)]
pub fn loading(props: &LoadingProps) -> Html {
    html! {
        <div class="loading-container">
            <div class="loading-spinner"></div>
            if let Some(msg) = &props.message {
                <p class="loading-message">{msg}</p>
            }
        </div>
    }
}
