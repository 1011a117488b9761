/// Sign-in and sign-up screens

use patternfly_yew::prelude::{Alert, AlertType, Button, ButtonVariant};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::api::ApiClient;
use crate::auth::{IdentityClient, RegistrationForm, register, sign_in};
use crate::config::ServiceConfig;
use crate::token::AuthToken;

fn bind_input(handle: &UseStateHandle<String>) -> Callback<InputEvent> {
    let handle = handle.clone();
    Callback::from(move |e: InputEvent| {
        if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
            handle.set(input.value());
        }
    })
}

#[derive(Properties, PartialEq)]
pub struct LoginProps {
    /// Fresh token from a successful sign-in
    pub on_token: Callback<AuthToken>,
    /// User says they signed in on the web app; resolve the stored token again
    pub on_recheck: Callback<()>,
    pub on_register: Callback<()>,
}

#[function_component(LoginView)]
pub fn login_view(props: &LoginProps) -> Html {
    let email = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let busy = use_state(|| false);
    let config = ServiceConfig::default();

    let on_sign_in = {
        let email = email.clone();
        let password = password.clone();
        let error = error.clone();
        let busy = busy.clone();
        let on_token = props.on_token.clone();
        let config = config.clone();

        Callback::from(move |_| {
            let email = (*email).clone();
            let password = (*password).clone();
            let error = error.clone();
            let busy = busy.clone();
            let on_token = on_token.clone();
            let identity = IdentityClient::new(config.clone());

            busy.set(true);
            spawn_local(async move {
                match sign_in(&identity, &email, &password).await {
                    Ok(token) => {
                        error.set(None);
                        on_token.emit(token);
                    }
                    Err(e) => error.set(Some(e.to_string())),
                }
                busy.set(false);
            });
        })
    };

    html! {
        <div class="auth-card">
            <h1 class="popup-title">{"Sign In"}</h1>

            if let Some(err) = (*error).clone() {
                <Alert r#type={AlertType::Danger} title={err} inline={true}>
                </Alert>
            }

            <div class="flex-column-gap">
                <input type="email" class="text-input" placeholder="Email"
                    value={(*email).clone()} oninput={bind_input(&email)} />
                <input type="password" class="text-input" placeholder="Password"
                    value={(*password).clone()} oninput={bind_input(&password)} />
                <Button onclick={on_sign_in} disabled={*busy} variant={ButtonVariant::Primary} block={true}>
                    {"Sign In"}
                </Button>
            </div>

            <p class="separator">{"OR"}</p>

            <div class="flex-column-gap">
                <a href={config.web_login_url()} target="_blank" rel="noopener noreferrer" class="link-button">
                    {"Sign in with Google, GitHub, Facebook or Microsoft"}
                </a>
                <Button onclick={props.on_recheck.reform(|_| ())} variant={ButtonVariant::Secondary} block={true}>
                    {"I've signed in on the website"}
                </Button>
            </div>

            <p class="footer-popup">
                {"Don't have an account? "}
                <a href="#" onclick={props.on_register.reform(|e: MouseEvent| e.prevent_default())}>
                    {"Sign Up"}
                </a>
            </p>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct RegisterProps {
    pub on_token: Callback<AuthToken>,
    pub on_login: Callback<()>,
}

#[function_component(RegisterView)]
pub fn register_view(props: &RegisterProps) -> Html {
    let name = use_state(String::new);
    let email = use_state(String::new);
    let password = use_state(String::new);
    let confirm = use_state(String::new);
    let error = use_state(|| None::<String>);
    let busy = use_state(|| false);
    let config = ServiceConfig::default();

    let on_sign_up = {
        let form_handles = (name.clone(), email.clone(), password.clone(), confirm.clone());
        let error = error.clone();
        let busy = busy.clone();
        let on_token = props.on_token.clone();
        let config = config.clone();

        Callback::from(move |_| {
            let (name, email, password, confirm) = &form_handles;
            let form = RegistrationForm {
                name: (**name).clone(),
                email: (**email).clone(),
                password: (**password).clone(),
                confirm_password: (**confirm).clone(),
            };
            // Mismatched passwords are reported before anything goes out
            if let Err(e) = form.validate() {
                error.set(Some(e.to_string()));
                return;
            }

            let error = error.clone();
            let busy = busy.clone();
            let on_token = on_token.clone();
            let identity = IdentityClient::new(config.clone());
            let user_data = ApiClient::new(config.clone());

            busy.set(true);
            spawn_local(async move {
                match register(&form, &identity, &user_data).await {
                    Ok(token) => {
                        error.set(None);
                        on_token.emit(token);
                    }
                    Err(e) => error.set(Some(e.to_string())),
                }
                busy.set(false);
            });
        })
    };

    html! {
        <div class="auth-card">
            <h1 class="popup-title">{"Sign Up"}</h1>

            if let Some(err) = (*error).clone() {
                <Alert r#type={AlertType::Danger} title={err} inline={true}>
                </Alert>
            }

            <div class="flex-column-gap">
                <input type="text" class="text-input" placeholder="Full Name"
                    value={(*name).clone()} oninput={bind_input(&name)} />
                <input type="email" class="text-input" placeholder="Email"
                    value={(*email).clone()} oninput={bind_input(&email)} />
                <input type="password" class="text-input" placeholder="Password"
                    value={(*password).clone()} oninput={bind_input(&password)} />
                <input type="password" class="text-input" placeholder="Confirm Password"
                    value={(*confirm).clone()} oninput={bind_input(&confirm)} />
                <Button onclick={on_sign_up} disabled={*busy} variant={ButtonVariant::Primary} block={true}>
                    {"Sign Up"}
                </Button>
            </div>

            <p class="separator">{"OR"}</p>

            <a href={config.web_register_url()} target="_blank" rel="noopener noreferrer" class="link-button">
                {"Sign up on the website"}
            </a>

            <p class="footer-popup">
                {"Already have an account? "}
                <a href="#" onclick={props.on_login.reform(|e: MouseEvent| e.prevent_default())}>
                    {"Sign In"}
                </a>
            </p>
        </div>
    }
}
