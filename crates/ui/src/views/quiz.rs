use dioxus::prelude::*;
use dioxus_router::Link;

use conceptly_core::model::{AnswerSheet, CheckpointId, SessionId};
use services::QuizError;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{
    QuestionVm, QuizResultVm, map_questions, map_quiz_result, pass_threshold_label,
    quiz_error_message,
};

#[component]
pub fn QuizView(session_id: u64, checkpoint_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let quiz = ctx.quiz();
    let session = SessionId::new(session_id);
    let checkpoint = CheckpointId::new(checkpoint_id);

    let sheet = use_signal(AnswerSheet::default);
    let mut outcome = use_signal(|| None::<QuizResultVm>);
    let mut error = use_signal(|| None::<&'static str>);
    let mut busy = use_signal(|| false);

    let resource = use_resource(move || {
        let quiz = quiz.clone();
        let mut sheet = sheet;
        async move {
            let questions = quiz
                .load_questions(session, checkpoint)
                .await
                .map_err(|err| match err {
                    QuizError::NoQuestions => ViewError::NotFound,
                    _ => ViewError::Unknown,
                })?;
            sheet.set(AnswerSheet::for_questions(questions.len()));
            Ok::<_, ViewError>(map_questions(&questions))
        }
    });
    let state = view_state_from_resource(&resource);

    let on_submit = {
        let quiz = ctx.quiz();
        move |evt: FormEvent| {
            evt.prevent_default();
            if busy() {
                return;
            }
            busy.set(true);
            let quiz = quiz.clone();
            let answers = sheet();
            spawn(async move {
                let result = quiz.submit(checkpoint, &answers).await;
                busy.set(false);
                match result {
                    Ok(done) => {
                        error.set(None);
                        outcome.set(Some(map_quiz_result(&done.result, done.next)));
                    }
                    Err(err) => error.set(Some(quiz_error_message(&err))),
                }
            });
        }
    };

    let on_retry = move |_: MouseEvent| {
        let mut sheet = sheet;
        let count = sheet.peek().len();
        sheet.set(AnswerSheet::for_questions(count));
        outcome.set(None);
    };

    let answered = sheet.read().answered_count();

    rsx! {
        div { class: "page quiz-page",
            h2 { "Checkpoint quiz" }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading questions..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    Link { class: "btn btn-ghost", to: Route::Session { session_id }, "Back to session" }
                },
                ViewState::Ready(questions) => rsx! {
                    if let Some(result) = outcome() {
                        QuizResultPanel {
                            result,
                            session_id,
                            checkpoint_id,
                            on_retry,
                        }
                    } else {
                        p { class: "quiz-threshold", "{pass_threshold_label()}" }
                        form { class: "quiz-form", onsubmit: on_submit,
                            for question in questions.clone() {
                                QuestionField { key: "{question.index}", question, sheet }
                            }
                            p { class: "quiz-progress", "{answered} of {questions.len()} answered" }
                            if let Some(message) = error() {
                                p { class: "form-error", role: "alert", "{message}" }
                            }
                            button { class: "btn btn-primary", r#type: "submit", disabled: busy(),
                                if busy() { "Checking..." } else { "Submit answers" }
                            }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn QuestionField(question: QuestionVm, sheet: Signal<AnswerSheet>) -> Element {
    let index = question.index;
    let current = sheet.read().get(index).unwrap_or_default().to_string();

    rsx! {
        fieldset { class: "quiz-question",
            legend { "{question.label}" }
            p { class: "quiz-question__prompt", "{question.prompt}" }
            if question.options.is_empty() {
                textarea {
                    class: "quiz-question__answer",
                    placeholder: "Explain in your own words",
                    value: "{current}",
                    oninput: move |evt| sheet.write().answer(index, evt.value()),
                }
            } else {
                for option in question.options {
                    AnswerOption {
                        key: "{option}",
                        selected: current == option,
                        option,
                        index,
                        sheet,
                    }
                }
            }
        }
    }
}

#[component]
fn AnswerOption(
    option: String,
    index: usize,
    selected: bool,
    sheet: Signal<AnswerSheet>,
) -> Element {
    let value = option.clone();

    rsx! {
        label { class: "quiz-option",
            input {
                r#type: "radio",
                name: "question-{index}",
                value: "{option}",
                checked: selected,
                onchange: move |_| sheet.write().answer(index, value.clone()),
            }
            "{option}"
        }
    }
}

#[component]
fn QuizResultPanel(
    result: QuizResultVm,
    session_id: u64,
    checkpoint_id: u64,
    on_retry: EventHandler<MouseEvent>,
) -> Element {
    let class = if result.passed {
        "quiz-result quiz-result--passed"
    } else {
        "quiz-result quiz-result--failed"
    };

    rsx! {
        section { class: "{class}",
            h3 { "{result.headline}" }
            p { class: "quiz-result__score", "{result.score_label}" }
            if let Some(xp) = result.xp_label {
                p { class: "quiz-result__xp", "{xp}" }
            }
            if !result.weak_areas.is_empty() {
                h4 { "Worth another look" }
                ul {
                    for area in result.weak_areas {
                        li { "{area}" }
                    }
                }
            }
            div { class: "quiz-result__actions",
                if result.offer_simplified {
                    Link {
                        class: "btn btn-primary",
                        to: Route::Explanation { session_id, checkpoint_id },
                        "Explain it more simply"
                    }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |evt| on_retry.call(evt),
                        "Try the quiz again"
                    }
                }
                Link {
                    class: if result.passed { "btn btn-primary" } else { "btn btn-ghost" },
                    to: Route::Session { session_id },
                    "Back to session"
                }
            }
        }
    }
}
