//! Control Loop Events
//!
//! Every hardware handler reports through one channel. The variants mirror
//! the interrupt sources of the original design, and their priorities mirror
//! its interrupt priorities: a pending freeze always lands before the blink
//! toggle it must suppress, and a pending byte always lands before the next
//! digit classification.

/// An event delivered to the control loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Button edge
    ButtonPress,
    /// A byte was pushed into the receive queue
    RxWakeup,
    /// Digit-analysis timer expiry
    AnalysisTick {
        /// Timer epoch the tick was produced under
        epoch: u64,
    },
    /// Blink timer expiry
    BlinkTick {
        /// Timer epoch the tick was produced under
        epoch: u64,
    },
}

impl Event {
    /// Dispatch priority; lower runs first
    pub fn priority(&self) -> u8 {
        match self {
            Event::ButtonPress => 0,
            Event::RxWakeup => 1,
            Event::AnalysisTick { .. } => 2,
            Event::BlinkTick { .. } => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        let mut batch = vec![
            Event::BlinkTick { epoch: 0 },
            Event::AnalysisTick { epoch: 0 },
            Event::RxWakeup,
            Event::ButtonPress,
        ];
        batch.sort_by_key(Event::priority);

        assert_eq!(
            batch,
            vec![
                Event::ButtonPress,
                Event::RxWakeup,
                Event::AnalysisTick { epoch: 0 },
                Event::BlinkTick { epoch: 0 },
            ]
        );
    }

    #[test]
    fn test_stable_sort_keeps_arrival_order_within_class() {
        let mut batch = vec![
            Event::AnalysisTick { epoch: 3 },
            Event::ButtonPress,
            Event::AnalysisTick { epoch: 4 },
        ];
        batch.sort_by_key(Event::priority);

        assert_eq!(
            batch,
            vec![
                Event::ButtonPress,
                Event::AnalysisTick { epoch: 3 },
                Event::AnalysisTick { epoch: 4 },
            ]
        );
    }
}
