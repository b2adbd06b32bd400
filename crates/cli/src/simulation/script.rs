//! Scripted dialog definitions
//!
//! Each dialog is a waterfall of prompts; every step carries an
//! abandon rate so simulated funnels narrow the way real ones do.

/// One prompt/answer step in a dialog
#[derive(Debug, Clone, Copy)]
pub struct StepScript {
    pub name: &'static str,
    /// Bot prompt sent when the step starts
    pub prompt: &'static str,
    /// Canned user answer
    pub answer: &'static str,
    /// Chance the simulated user walks away at this step
    pub abandon_rate: f64,
}

/// A named multi-step dialog
#[derive(Debug, Clone, Copy)]
pub struct DialogScript {
    pub name: &'static str,
    pub steps: &'static [StepScript],
}

/// The scripted dialog catalog every simulated user walks through
pub fn dialog_catalog() -> &'static [DialogScript] {
    const GREETING: &[StepScript] = &[
        StepScript {
            name: "Name",
            prompt: "Hi! What should I call you?",
            answer: "Call me Sam",
            abandon_rate: 0.10,
        },
        StepScript {
            name: "Location",
            prompt: "Nice to meet you. Where are you located?",
            answer: "Seattle",
            abandon_rate: 0.0,
        },
    ];

    const BOOK_TABLE: &[StepScript] = &[
        StepScript {
            name: "Guests",
            prompt: "How many guests will be joining?",
            answer: "Four of us",
            abandon_rate: 0.15,
        },
        StepScript {
            name: "Restaurant",
            prompt: "Which restaurant would you like?",
            answer: "The harbor place",
            abandon_rate: 0.10,
        },
        StepScript {
            name: "Time",
            prompt: "What time works for you?",
            answer: "Seven thirty",
            abandon_rate: 0.0,
        },
    ];

    const CATALOG: &[DialogScript] = &[
        DialogScript {
            name: "Greeting",
            steps: GREETING,
        },
        DialogScript {
            name: "BookTable",
            steps: BOOK_TABLE,
        },
    ];

    CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_shape() {
        let catalog = dialog_catalog();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].name, "Greeting");
        assert_eq!(catalog[1].steps.len(), 3);
        // final steps never abandon, so complete funnels exist
        for dialog in catalog {
            assert_eq!(dialog.steps.last().unwrap().abandon_rate, 0.0);
        }
    }
}
