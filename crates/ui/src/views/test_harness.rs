use std::sync::Arc;
use std::time::Duration;

use conceptly_core::model::UserProfile;
use conceptly_core::time::fixed_clock;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::testing::FakeApi;
use services::{
    AppServices, AuthService, ExplanationService, GamificationService, ProgressService,
    QuizService, SessionController, SessionsService,
};
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context};
use crate::views::session::SessionTestHandles;
use crate::views::{
    AnalyticsView, DashboardView, ExplanationView, HistoryView, LoginView, QuizView,
    SessionDetailsView, SessionView,
};

struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn restored_profile(&self) -> Option<UserProfile> {
        None
    }

    fn auth(&self) -> Arc<AuthService> {
        self.services.auth()
    }

    fn sessions(&self) -> Arc<SessionsService> {
        self.services.sessions()
    }

    fn quiz(&self) -> Arc<QuizService> {
        self.services.quiz()
    }

    fn explanations(&self) -> Arc<ExplanationService> {
        self.services.explanations()
    }

    fn progress(&self) -> Arc<ProgressService> {
        self.services.progress()
    }

    fn gamification(&self) -> Arc<GamificationService> {
        self.services.gamification()
    }

    fn session_controller(&self) -> SessionController {
        self.services.session_controller()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Login,
    Dashboard,
    Session(u64),
    Quiz(u64, u64),
    Explanation(u64, u64),
    History,
    SessionDetails(u64),
    Analytics,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    session_handles: Option<SessionTestHandles>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    if let Some(handles) = props.session_handles.clone() {
        use_context_provider(|| handles);
    }
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    match use_context::<ViewKind>() {
        ViewKind::Login => rsx! { LoginView {} },
        ViewKind::Dashboard => rsx! { DashboardView {} },
        ViewKind::Session(session_id) => rsx! { SessionView { session_id } },
        ViewKind::Quiz(session_id, checkpoint_id) => rsx! {
            QuizView { session_id, checkpoint_id }
        },
        ViewKind::Explanation(session_id, checkpoint_id) => rsx! {
            ExplanationView { session_id, checkpoint_id }
        },
        ViewKind::History => rsx! { HistoryView {} },
        ViewKind::SessionDetails(session_id) => rsx! { SessionDetailsView { session_id } },
        ViewKind::Analytics => rsx! { AnalyticsView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub api: FakeApi,
    pub session_handles: Option<SessionTestHandles>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(Duration::from_millis(50), self.dom.wait_for_work()).await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drive pending work until the rendered html satisfies `done`.
    pub async fn drive_until(&mut self, done: impl Fn(&str) -> bool) -> String {
        for _ in 0..40 {
            let html = self.render();
            if done(&html) {
                return html;
            }
            self.drive_async().await;
        }
        self.render()
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, api: FakeApi) -> ViewHarness {
    let storage = Storage::in_memory();
    let services = AppServices::from_parts(fixed_clock(), Arc::new(api.clone()), &storage);
    let app = Arc::new(TestApp { services });
    let session_handles = match view {
        ViewKind::Session(_) => Some(SessionTestHandles::default()),
        _ => None,
    };
    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            session_handles: session_handles.clone(),
        },
    );

    ViewHarness {
        dom,
        api,
        session_handles,
    }
}
