use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{
    AnalyticsView, DashboardView, ExplanationView, HistoryView, LoginView, QuizView, RegisterView,
    SessionDetailsView, SessionView, StartView,
};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", StartView)] Start {},
        #[route("/login", LoginView)] Login {},
        #[route("/register", RegisterView)] Register {},
        #[route("/dashboard", DashboardView)] Dashboard {},
        #[route("/sessions/:session_id", SessionView)] Session { session_id: u64 },
        #[route("/sessions/:session_id/checkpoints/:checkpoint_id/quiz", QuizView)]
        Quiz { session_id: u64, checkpoint_id: u64 },
        #[route("/sessions/:session_id/checkpoints/:checkpoint_id/explain", ExplanationView)]
        Explanation { session_id: u64, checkpoint_id: u64 },
        #[route("/history", HistoryView)] History {},
        #[route("/history/:session_id", SessionDetailsView)] SessionDetails { session_id: u64 },
        #[route("/analytics", AnalyticsView)] Analytics {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            TopBar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn TopBar() -> Element {
    rsx! {
        header { class: "topbar",
            h1 { class: "topbar__brand", "Conceptly" }
            nav {
                Link { to: Route::Dashboard {}, "Dashboard" }
                Link { to: Route::History {}, "History" }
                Link { to: Route::Analytics {}, "Analytics" }
            }
        }
    }
}
