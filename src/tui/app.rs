use crate::{core::Monitor, tui::input::Action};

/// Lines moved per PageUp/PageDown.
pub const SCROLL_STEP: usize = 10;

/// The monitor plus view-only state (scroll position, quit flag).
pub struct App {
    pub monitor: Monitor,
    /// Lines scrolled back from the newest one; 0 follows new input.
    pub scroll: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(monitor: Monitor) -> Self {
        Self {
            monitor,
            scroll: 0,
            should_quit: false,
        }
    }

    pub fn handle(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::PortNext => self.monitor.select_next_port(),
            Action::PortPrev => self.monitor.select_prev_port(),
            Action::BaudNext => self.monitor.next_baud(),
            Action::BaudPrev => self.monitor.prev_baud(),
            Action::Refresh => self.monitor.refresh_ports(),
            Action::ToggleConnection => self.monitor.toggle_connection(),
            Action::ToggleLogging => self.monitor.toggle_logging(),
            Action::ScrollUp => {
                let max = self.monitor.display().len().saturating_sub(1);
                self.scroll = (self.scroll + SCROLL_STEP).min(max);
            }
            Action::ScrollDown => self.scroll = self.scroll.saturating_sub(SCROLL_STEP),
            Action::Follow => self.scroll = 0,
            Action::None => {}
        }
    }

    /// Periodic poll. While scrolled back, the view stays on the same lines.
    pub fn on_tick(&mut self) {
        let before = appended_total(&self.monitor);
        self.monitor.tick();
        if self.scroll > 0 {
            let added = appended_total(&self.monitor) - before;
            let max = self.monitor.display().len().saturating_sub(1);
            self.scroll = (self.scroll + added).min(max);
        }
    }

    pub fn is_following(&self) -> bool {
        self.scroll == 0
    }
}

/// Every line ever appended to the display, evicted ones included.
fn appended_total(monitor: &Monitor) -> usize {
    monitor.display().len() + monitor.display().evicted()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::MonitorOptions, protocol::loopback::LoopbackBackend};

    fn app_with_lines(n: usize) -> (App, LoopbackBackend) {
        let backend = LoopbackBackend::new();
        let device = backend.add_device("COM1");
        let mut app = App::new(Monitor::new(
            Box::new(backend.clone()),
            MonitorOptions::default(),
        ));
        app.handle(Action::ToggleConnection);
        for i in 0..n {
            device.inject(format!("line {i}\n").as_bytes());
        }
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(2);
        while app.monitor.display().len() < n && std::time::Instant::now() < deadline {
            app.on_tick();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        (app, backend)
    }

    #[test]
    fn scrolling_is_clamped() {
        let (mut app, _backend) = app_with_lines(15);
        assert!(app.is_following());
        app.handle(Action::ScrollUp);
        assert_eq!(app.scroll, 10);
        app.handle(Action::ScrollUp);
        assert_eq!(app.scroll, 14);
        app.handle(Action::ScrollDown);
        assert_eq!(app.scroll, 4);
        app.handle(Action::Follow);
        assert!(app.is_following());
    }

    #[test]
    fn quit_sets_flag() {
        let (mut app, _backend) = app_with_lines(0);
        app.handle(Action::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn actions_drive_monitor() {
        let (mut app, _backend) = app_with_lines(0);
        assert!(app.monitor.is_connected());
        app.handle(Action::BaudNext);
        assert_eq!(app.monitor.baud().as_u32(), 19200);
        app.handle(Action::ToggleConnection);
        assert!(!app.monitor.is_connected());
    }

    #[test]
    fn inline_error_does_not_shift_scrolled_view() {
        let backend = LoopbackBackend::new();
        let device = backend.add_device("COM1");
        let mut app = App::new(Monitor::new(
            Box::new(backend.clone()),
            MonitorOptions::default(),
        ));
        app.handle(Action::ToggleConnection);
        for i in 0..15 {
            device.inject(format!("line {i}\n").as_bytes());
        }
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(2);
        while app.monitor.display().len() < 15 && std::time::Instant::now() < deadline {
            app.on_tick();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        app.handle(Action::ScrollUp);
        let end_before = app.monitor.display().len() - app.scroll;

        device.fail(std::io::ErrorKind::BrokenPipe);
        while app.monitor.is_connected() && std::time::Instant::now() < deadline {
            app.on_tick();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert!(!app.monitor.is_connected());
        assert_eq!(app.monitor.display().len(), 16);
        assert_eq!(app.monitor.display().len() - app.scroll, end_before);
    }

    #[test]
    fn eviction_keeps_scrolled_view_anchored() {
        let backend = LoopbackBackend::new();
        let device = backend.add_device("COM1");
        let mut app = App::new(Monitor::new(
            Box::new(backend.clone()),
            MonitorOptions {
                max_lines: Some(20),
                ..MonitorOptions::default()
            },
        ));
        app.handle(Action::ToggleConnection);
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(2);
        for i in 0..20 {
            device.inject(format!("a{i}\n").as_bytes());
        }
        while app.monitor.display().len() < 20 && std::time::Instant::now() < deadline {
            app.on_tick();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        app.handle(Action::ScrollUp);
        assert_eq!(app.scroll, 10);

        for i in 0..3 {
            device.inject(format!("b{i}\n").as_bytes());
        }
        while app.monitor.display().evicted() < 3 && std::time::Instant::now() < deadline {
            app.on_tick();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert_eq!(app.monitor.display().evicted(), 3);
        assert_eq!(app.scroll, 13);
        let end = app.monitor.display().len() - app.scroll;
        assert_eq!(app.monitor.display().lines()[end - 1].text, "a9");
    }
}
