use dioxus::prelude::*;

use scraplink_common::wizard::WizardStep;

/// Numbered header for the pickup wizard: done / active / upcoming dots
/// with connecting lines.
#[component]
pub fn ProgressSteps(current: WizardStep) -> Element {
    let steps = WizardStep::all();
    let last = steps.len();

    rsx! {
        div { class: "progress-steps",
            {steps.iter().map(|step| {
                let number = step.number();
                let state = if number < current.number() {
                    "done"
                } else if number == current.number() {
                    "active"
                } else {
                    "upcoming"
                };
                rsx! {
                    div { class: "progress-step progress-step-{state}",
                        key: "{number}",
                        span { class: "step-dot", "{number}" }
                        span { class: "step-label", "{step.label()}" }
                        if usize::from(number) < last {
                            span { class: "step-line" }
                        }
                    }
                }
            })}
        }
    }
}
