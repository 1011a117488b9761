/// Popup UI for the LeetPath extension

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::chrome::RuntimeMessenger;
use crate::session::{SessionBootstrap, SessionState};
use crate::token::AuthToken;
use crate::ui::auth::{LoginView, RegisterView};
use crate::ui::components::Loading;
use crate::ui::profile::ProfileView;
use crate::ui::recommendations::RecommendationsView;

#[derive(Clone, Copy, PartialEq)]
enum Screen {
    Login,
    Register,
    Profile,
    Recommendations,
}

#[function_component(App)]
pub fn app() -> Html {
    let session = use_state(SessionState::default);
    let screen = use_state(|| Screen::Login);

    // Ask the background relay for a stored token on mount
    {
        let session = session.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let resolved = SessionBootstrap::new(RuntimeMessenger).resolve().await;
                session.set(resolved);
            });
            || ()
        });
    }

    let on_token = {
        let session = session.clone();
        let screen = screen.clone();
        Callback::from(move |token: AuthToken| {
            let session = session.clone();
            let screen = screen.clone();
            session.set(SessionState::Resolving);
            spawn_local(async move {
                let adopted = SessionBootstrap::new(RuntimeMessenger).adopt(token).await;
                session.set(adopted);
                screen.set(Screen::Profile);
            });
        })
    };

    let on_recheck = {
        let session = session.clone();
        Callback::from(move |_| {
            let session = session.clone();
            session.set(session.begin_sign_in());
            spawn_local(async move {
                let resolved = SessionBootstrap::new(RuntimeMessenger).resolve().await;
                session.set(resolved);
            });
        })
    };

    let on_sign_out = {
        let session = session.clone();
        let screen = screen.clone();
        Callback::from(move |_| {
            session.set(session.sign_out());
            screen.set(Screen::Login);
        })
    };

    let goto = |target: Screen| {
        let screen = screen.clone();
        Callback::from(move |_| screen.set(target))
    };

    let content = match (&*session, *screen) {
        (SessionState::Resolving, _) => html! {
            <Loading message={Some("Loading...".to_string())} />
        },
        (SessionState::Unauthenticated, Screen::Register) => html! {
            <RegisterView on_token={on_token} on_login={goto(Screen::Login)} />
        },
        (SessionState::Unauthenticated, _) => html! {
            <LoginView on_token={on_token} on_recheck={on_recheck} on_register={goto(Screen::Register)} />
        },
        (SessionState::Authenticated { email, .. }, Screen::Recommendations) => html! {
            <RecommendationsView email={email.clone()} on_profile={goto(Screen::Profile)} />
        },
        (SessionState::Authenticated { email, .. }, _) => html! {
            <ProfileView
                email={email.clone()}
                on_recommendations={goto(Screen::Recommendations)}
                on_sign_out={on_sign_out}
            />
        },
    };

    html! {
        <div class="popup-container">
            {content}
        </div>
    }
}
