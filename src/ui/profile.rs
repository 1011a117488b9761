/// Profile screen: solved counts, editable details, avatar

use patternfly_yew::prelude::{Button, ButtonVariant};
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::api::{ApiClient, UserDataService};
use crate::config::ServiceConfig;
use crate::profile::{
    EditorAction, NOTIFICATION_MILLIS, ProfileEditor, ProfileField, delete_avatar, fetch_avatar,
    load_profile, upload_avatar,
};
use crate::ui::components::{Loading, SolvedStats, Toast};

impl Reducible for ProfileEditor {
    type Action = EditorAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        Rc::new(next)
    }
}

#[derive(Properties, PartialEq)]
pub struct ProfileProps {
    pub email: AttrValue,
    pub on_recommendations: Callback<()>,
    pub on_sign_out: Callback<()>,
}

#[function_component(ProfileView)]
pub fn profile_view(props: &ProfileProps) -> Html {
    let loading = use_state(|| true);
    let editor = use_reducer(ProfileEditor::default);
    let avatar_url = use_state(|| None::<String>);
    let client = use_memo((), |_| ApiClient::new(ServiceConfig::default()));

    // Load profile and avatar on mount
    {
        let loading = loading.clone();
        let editor = editor.dispatcher();
        let avatar_url = avatar_url.clone();
        let client = client.clone();
        let email = props.email.to_string();

        use_effect_with((), move |_| {
            spawn_local(async move {
                let profile = load_profile(&*client, &email).await;
                editor.dispatch(EditorAction::Loaded(profile));
                loading.set(false);

                if let Some(bytes) = fetch_avatar(&*client, &email).await {
                    avatar_url.set(object_url(&bytes));
                }
            });
            || ()
        });
    }

    let on_edit_save = {
        let editor = editor.clone();
        let client = client.clone();

        Callback::from(move |_| {
            if !editor.editing {
                editor.dispatch(EditorAction::BeginEdit);
                return;
            }
            let Some(profile) = editor.save_request() else {
                return;
            };
            let notice = editor.next_notice();
            let dispatcher = editor.dispatcher();
            let client = client.clone();

            dispatcher.dispatch(EditorAction::SaveStarted);
            spawn_local(async move {
                let result = client.update_user(&profile).await;
                dispatcher.dispatch(EditorAction::SaveFinished(result));

                yew::platform::time::sleep(Duration::from_millis(NOTIFICATION_MILLIS)).await;
                dispatcher.dispatch(EditorAction::ClearNotification(notice));
            });
        })
    };

    let on_field = {
        let editor = editor.dispatcher();
        move |field: ProfileField| {
            let editor = editor.clone();
            Callback::from(move |e: InputEvent| {
                if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                    editor.dispatch(EditorAction::SetField(field, input.value()));
                }
            })
        }
    };

    let on_upload = {
        let avatar_url = avatar_url.clone();
        let client = client.clone();
        let email = props.email.to_string();

        Callback::from(move |e: Event| {
            let Some(file) = e
                .target_dyn_into::<HtmlInputElement>()
                .and_then(|input| input.files())
                .and_then(|files| files.get(0))
            else {
                return;
            };
            if !file.type_().starts_with("image/") {
                log::warn!("Please upload a valid image file");
                return;
            }

            let avatar_url = avatar_url.clone();
            let client = client.clone();
            let email = email.clone();
            spawn_local(async move {
                match JsFuture::from(file.array_buffer()).await {
                    Ok(buffer) => {
                        let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
                        avatar_url.set(object_url(&bytes));
                        upload_avatar(&*client, &email, bytes).await;
                    }
                    Err(e) => log::warn!("Could not read image file: {:?}", e),
                }
            });
        })
    };

    let on_delete_image = {
        let avatar_url = avatar_url.clone();
        let client = client.clone();
        let email = props.email.to_string();

        Callback::from(move |_| {
            avatar_url.set(None);
            let client = client.clone();
            let email = email.clone();
            spawn_local(async move {
                delete_avatar(&*client, &email).await;
            });
        })
    };

    if *loading {
        return html! {
            <Loading message={Some("Loading...".to_string())} />
        };
    }

    let locked = !editor.editing || editor.saving;

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Profile"}</h1>

            if let Some(url) = (*avatar_url).clone() {
                <img src={url} alt="Profile" class="avatar" />
            } else {
                <div class="avatar avatar-placeholder"></div>
            }

            if editor.editing {
                <div class="avatar-actions">
                    <input type="file" accept="image/*" onchange={on_upload} />
                    <Button onclick={on_delete_image} variant={ButtonVariant::Danger}>
                        {"Delete Image"}
                    </Button>
                </div>
            }

            {match &editor.profile {
                Some(profile) => html! {
                    <div class="flex-column-gap">
                        <p class="welcome">{format!("Welcome, {}", profile.username)}</p>

                        <label>{"Username"}</label>
                        <input type="text" class="text-input" value={profile.username.clone()}
                            readonly={locked} oninput={on_field(ProfileField::Username)} />
                        <label>{"Name"}</label>
                        <input type="text" class="text-input" value={profile.name.clone()}
                            readonly={locked} oninput={on_field(ProfileField::Name)} />
                        <label>{"Institution"}</label>
                        <input type="text" class="text-input" value={profile.institution.clone()}
                            readonly={locked} oninput={on_field(ProfileField::Institution)} />

                        if let Some(err) = &editor.error {
                            <p class="error-text">{err}</p>
                        }

                        <h2 class="stats-title">{"Solved Problems"}</h2>
                        <SolvedStats solved={profile.solved} />

                        <Button onclick={on_edit_save} disabled={editor.saving} variant={ButtonVariant::Secondary} block={true}>
                            {if editor.editing { "Save" } else { "Edit" }}
                        </Button>
                    </div>
                },
                None => html! {
                    <p class="welcome">{format!("Welcome, {}", props.email)}</p>
                },
            }}

            <div class="flex-column-gap">
                <Button onclick={props.on_recommendations.reform(|_| ())} variant={ButtonVariant::Primary} block={true}>
                    {"Questions"}
                </Button>
                <Button onclick={props.on_sign_out.reform(|_| ())} variant={ButtonVariant::Danger} block={true}>
                    {"Log Out"}
                </Button>
            </div>

            if let Some(notification) = editor.notification.clone() {
                <Toast {notification} />
            }
        </div>
    }
}

/// Blob URL for image bytes
fn object_url(bytes: &[u8]) -> Option<String> {
    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::of1(&array);
    let blob = web_sys::Blob::new_with_u8_array_sequence(&parts).ok()?;
    web_sys::Url::create_object_url_with_blob(&blob).ok()
}

