use super::*;

use std::time::{Duration, Instant};

use proptest::prelude::*;

const TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug)]
struct FakeHost {
    names: Vec<String>,
    order: Vec<usize>,
    displayed: usize,
    restricted: bool,
    width: u16,
    status: Option<StatusLine>,
    display_calls: Vec<usize>,
}

impl FakeHost {
    fn new(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|name| name.to_string()).collect(),
            order: (0..names.len()).collect(),
            displayed: 0,
            restricted: false,
            width: 80,
            status: None,
            display_calls: Vec::new(),
        }
    }

    fn order_names(&self) -> Vec<&str> {
        self.order
            .iter()
            .map(|idx| self.names[*idx].as_str())
            .collect()
    }

    fn displayed_name(&self) -> &str {
        &self.names[self.displayed]
    }

    fn status_text(&self) -> Option<String> {
        self.status.as_ref().map(|line| line.to_string())
    }
}

impl Host for FakeHost {
    type Item = usize;

    fn list_items(&self) -> Vec<usize> {
        self.order.clone()
    }

    fn current_item(&self) -> usize {
        self.displayed
    }

    fn item_name(&self, item: &usize) -> String {
        self.names[*item].clone()
    }

    fn display_item(&mut self, item: &usize) {
        self.displayed = *item;
        self.display_calls.push(*item);
    }

    fn is_restricted_context(&self) -> bool {
        self.restricted
    }

    fn demote(&mut self, item: &usize) {
        self.order.retain(|existing| existing != item);
        self.order.push(*item);
    }

    fn status_width(&self) -> u16 {
        self.width
    }

    fn set_status_line(&mut self, line: StatusLine) {
        self.status = Some(line);
    }

    fn clear_status_line(&mut self) {
        self.status = None;
    }
}

#[test]
fn forward_presses_walk_the_list_and_wrap() {
    let mut host = FakeHost::new(&["Alpha", "Beta", "Gamma"]);
    let mut switcher = Switcher::new(TIMEOUT);
    let now = Instant::now();

    assert_eq!(
        switcher.trigger(&mut host, Direction::Forward, now),
        Disposition::Consumed
    );
    assert_eq!(switcher.current_index(), Some(1));
    assert_eq!(host.displayed_name(), "Beta");
    assert_eq!(
        switcher.working_set().map(|set| set.names()),
        Some(vec!["Alpha", "Beta", "Gamma"])
    );

    switcher.trigger(&mut host, Direction::Forward, now);
    switcher.trigger(&mut host, Direction::Forward, now);
    assert_eq!(switcher.current_index(), Some(0));
    assert_eq!(host.displayed_name(), "Alpha");
}

#[test]
fn backward_press_from_start_selects_the_oldest_item() {
    let mut host = FakeHost::new(&["Alpha", "Beta", "Gamma"]);
    let mut switcher = Switcher::new(TIMEOUT);
    switcher.trigger(&mut host, Direction::Backward, Instant::now());
    assert_eq!(switcher.current_index(), Some(2));
    assert_eq!(host.displayed_name(), "Gamma");
}

#[test]
fn hidden_items_are_skipped_while_cycling() {
    let mut host = FakeHost::new(&["Alpha", " hidden", "Beta"]);
    let mut switcher = Switcher::new(TIMEOUT);
    switcher.trigger(&mut host, Direction::Forward, Instant::now());
    let set = switcher.working_set().expect("session should be active");
    assert_eq!(set.names(), vec!["Alpha", "Beta"]);
    assert_eq!(host.displayed_name(), "Beta");
}

#[test]
fn display_does_not_reorder_host_list_mid_session() {
    let mut host = FakeHost::new(&["Alpha", "Beta", "Gamma"]);
    let mut switcher = Switcher::new(TIMEOUT);
    let now = Instant::now();
    switcher.trigger(&mut host, Direction::Forward, now);
    switcher.trigger(&mut host, Direction::Forward, now);
    assert_eq!(host.order_names(), vec!["Alpha", "Beta", "Gamma"]);
}

#[test]
fn timeout_promotes_the_selection_and_keeps_the_rest_in_order() {
    let mut host = FakeHost::new(&["Alpha", "Beta", "Gamma"]);
    let mut switcher = Switcher::new(TIMEOUT);
    let now = Instant::now();
    switcher.trigger(&mut host, Direction::Forward, now);
    switcher.trigger(&mut host, Direction::Forward, now);
    assert_eq!(switcher.current_index(), Some(2));

    assert_eq!(
        switcher.handle_timeout(&mut host, now + Duration::from_secs(1)),
        Disposition::Consumed
    );
    assert!(switcher.is_active());

    assert_eq!(
        switcher.handle_timeout(&mut host, now + TIMEOUT),
        Disposition::Finished { replay: false }
    );
    assert!(!switcher.is_active());
    assert_eq!(host.order_names(), vec!["Gamma", "Alpha", "Beta"]);
    assert_eq!(host.status, None);
}

#[test]
fn commit_demotes_hidden_items_behind_the_selection_too() {
    let mut host = FakeHost::new(&["Alpha", " hidden", "Beta", "Gamma"]);
    let mut switcher = Switcher::new(TIMEOUT);
    let now = Instant::now();
    switcher.trigger(&mut host, Direction::Forward, now);
    switcher.handle_timeout(&mut host, now + TIMEOUT);
    assert_eq!(host.order_names(), vec!["Beta", "Alpha", " hidden", "Gamma"]);
}

#[test]
fn unrelated_input_ends_the_session_and_is_replayed() {
    let mut host = FakeHost::new(&["Alpha", "Beta", "Gamma"]);
    let mut switcher = Switcher::new(TIMEOUT);
    let now = Instant::now();
    switcher.trigger(&mut host, Direction::Forward, now);
    assert_eq!(
        switcher.handle_input(&mut host, Input::Other, now),
        Disposition::Finished { replay: true }
    );
    assert!(!switcher.is_active());
    assert_eq!(host.order_names(), vec!["Beta", "Alpha", "Gamma"]);
}

#[test]
fn frame_events_are_tolerated_without_extending_the_deadline() {
    let mut host = FakeHost::new(&["Alpha", "Beta"]);
    let mut switcher = Switcher::new(TIMEOUT);
    let now = Instant::now();
    switcher.trigger(&mut host, Direction::Forward, now);
    let later = now + Duration::from_secs(2);
    assert_eq!(
        switcher.handle_input(&mut host, Input::FrameEvent, later),
        Disposition::Consumed
    );
    assert!(switcher.is_active());
    assert_eq!(switcher.remaining(later), Some(Duration::from_secs(1)));
}

#[test]
fn frame_event_redraws_the_status_line_at_the_new_width() {
    let mut host = FakeHost::new(&["Alpha", "Beta", "Gamma", "Delta"]);
    let mut switcher = Switcher::new(TIMEOUT);
    let now = Instant::now();
    switcher.trigger(&mut host, Direction::Forward, now);
    assert!(host.status.as_ref().map(|line| line.width()) > Some(8));

    host.width = 8;
    let later = now + Duration::from_secs(1);
    switcher.handle_input(&mut host, Input::FrameEvent, later);
    let line = host.status.as_ref().expect("status line should still be shown");
    assert!(line.width() <= 8);
    assert!(line.to_string().contains("<Beta>"));
    assert_eq!(host.displayed_name(), "Beta");
    assert_eq!(switcher.remaining(later), Some(Duration::from_secs(2)));
}

#[test]
fn each_trigger_rearms_the_idle_deadline() {
    let mut host = FakeHost::new(&["Alpha", "Beta", "Gamma"]);
    let mut switcher = Switcher::new(TIMEOUT);
    let now = Instant::now();
    switcher.trigger(&mut host, Direction::Forward, now);
    let later = now + Duration::from_secs(2);
    switcher.trigger(&mut host, Direction::Forward, later);
    assert_eq!(
        switcher.handle_timeout(&mut host, now + TIMEOUT),
        Disposition::Consumed
    );
    assert_eq!(switcher.remaining(now + TIMEOUT), Some(Duration::from_secs(2)));
}

#[test]
fn idle_switcher_ignores_non_trigger_input() {
    let mut host = FakeHost::new(&["Alpha", "Beta"]);
    let mut switcher: Switcher<usize> = Switcher::new(TIMEOUT);
    let now = Instant::now();
    assert_eq!(
        switcher.handle_input(&mut host, Input::Other, now),
        Disposition::Ignored
    );
    assert_eq!(
        switcher.handle_input(&mut host, Input::FrameEvent, now),
        Disposition::Ignored
    );
    assert_eq!(switcher.handle_timeout(&mut host, now), Disposition::Ignored);
    assert_eq!(switcher.remaining(now), None);
}

#[test]
fn restricted_context_refuses_to_start() {
    let mut host = FakeHost::new(&["Alpha", "Beta"]);
    host.restricted = true;
    let mut switcher = Switcher::new(TIMEOUT);
    assert_eq!(
        switcher.trigger(&mut host, Direction::Forward, Instant::now()),
        Disposition::Ignored
    );
    assert!(!switcher.is_active());
    assert_eq!(host.displayed_name(), "Alpha");
    assert_eq!(host.status, None);
}

#[test]
fn single_item_session_is_inert_but_still_shows_status() {
    let mut host = FakeHost::new(&["Alpha", " *Minibuf-0*"]);
    let mut switcher = Switcher::new(TIMEOUT);
    let now = Instant::now();
    switcher.trigger(&mut host, Direction::Forward, now);
    switcher.trigger(&mut host, Direction::Backward, now);
    assert_eq!(switcher.current_index(), Some(0));
    assert!(host.display_calls.is_empty());
    assert_eq!(host.status_text().as_deref(), Some("<Alpha>"));
}

#[test]
fn status_line_tracks_the_selection() {
    let mut host = FakeHost::new(&["Alpha", "Beta", "Gamma"]);
    let mut switcher = Switcher::new(TIMEOUT);
    switcher.trigger(&mut host, Direction::Forward, Instant::now());
    assert_eq!(host.status_text().as_deref(), Some("Alpha  <Beta> Gamma "));
}

#[test]
fn status_line_scrolls_in_a_narrow_echo_area() {
    let mut host = FakeHost::new(&["aaaa", "bbbb", "cccc", "dddd"]);
    host.width = 10;
    let mut switcher = Switcher::new(TIMEOUT);
    let now = Instant::now();
    switcher.trigger(&mut host, Direction::Forward, now);
    assert_eq!(host.status_text().as_deref(), Some("<bbbb>"));
    switcher.trigger(&mut host, Direction::Forward, now);
    assert_eq!(host.status_text().as_deref(), Some("<cccc>"));
}

#[test]
fn new_session_starts_from_the_committed_item() {
    let mut host = FakeHost::new(&["Alpha", "Beta", "Gamma"]);
    let mut switcher = Switcher::new(TIMEOUT);
    let now = Instant::now();
    switcher.trigger(&mut host, Direction::Forward, now);
    switcher.trigger(&mut host, Direction::Forward, now);
    switcher.handle_timeout(&mut host, now + TIMEOUT);

    switcher.trigger(&mut host, Direction::Forward, now + TIMEOUT);
    assert_eq!(
        switcher.working_set().map(|set| set.names()),
        Some(vec!["Gamma", "Alpha", "Beta"])
    );
    assert_eq!(host.displayed_name(), "Alpha");
}

proptest! {
    #[test]
    fn index_stays_in_range_for_any_press_sequence(
        len in 1usize..8,
        presses in prop::collection::vec(any::<bool>(), 0..40),
    ) {
        let names: Vec<String> = (0..len).map(|idx| format!("buf{idx}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut host = FakeHost::new(&refs);
        let mut switcher = Switcher::new(TIMEOUT);
        let now = Instant::now();
        for forward in presses {
            let direction = if forward { Direction::Forward } else { Direction::Backward };
            switcher.trigger(&mut host, direction, now);
            let index = switcher.current_index().unwrap_or(0);
            prop_assert!(index < len);
        }
    }

    #[test]
    fn commit_puts_the_selection_first_and_preserves_the_rest(
        len in 1usize..8,
        steps in 0usize..20,
    ) {
        let names: Vec<String> = (0..len).map(|idx| format!("buf{idx}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut host = FakeHost::new(&refs);
        let mut switcher = Switcher::new(TIMEOUT);
        let now = Instant::now();
        for _ in 0..steps.max(1) {
            switcher.trigger(&mut host, Direction::Forward, now);
        }
        let chosen = host.displayed;
        switcher.handle_timeout(&mut host, now + TIMEOUT);
        prop_assert_eq!(host.order[0], chosen);
        let rest: Vec<usize> = (0..len).filter(|idx| *idx != chosen).collect();
        prop_assert_eq!(&host.order[1..], rest.as_slice());
    }
}
