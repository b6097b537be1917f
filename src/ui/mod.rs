use color_eyre::Result;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Paragraph};

use crate::format::{format_gib, format_hours_minutes, format_watts};
use crate::metrics::sample::ChargeState;
use crate::metrics::snapshot::Snapshot;
use crate::scheduler::DisplaySink;

const UNAVAILABLE: &str = "n/a";

/// Display sink backed by the real terminal. Holds the most recent
/// snapshot so a resize can redraw without waiting for the next tick.
pub struct TerminalSink {
    terminal: ratatui::DefaultTerminal,
    last: Option<Snapshot>,
}

impl TerminalSink {
    pub fn new(terminal: ratatui::DefaultTerminal) -> Self {
        TerminalSink {
            terminal,
            last: None,
        }
    }
}

impl DisplaySink for TerminalSink {
    fn update(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.terminal.draw(|frame| draw(frame, snapshot))?;
        self.last = Some(snapshot.clone());
        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        if let Some(snapshot) = self.last.clone() {
            self.terminal.draw(|frame| draw(frame, &snapshot))?;
        }
        Ok(())
    }
}

pub fn draw(frame: &mut Frame, snapshot: &Snapshot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(8),
        ])
        .split(frame.area());

    render_info_bar(frame, chunks[0]);
    render_cpu(frame, chunks[1], snapshot);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(33), Constraint::Percentage(67)])
        .split(chunks[2]);

    render_memory(frame, bottom[0], snapshot);
    render_battery(frame, bottom[1], snapshot);
}

fn render_info_bar(frame: &mut Frame, area: Rect) {
    let paragraph =
        Paragraph::new("press q to quit").block(Block::bordered().title(" vitals "));
    frame.render_widget(paragraph, area);
}

fn render_cpu(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let block = Block::bordered().title("CPU");
    if snapshot.cpu.is_empty() {
        frame.render_widget(Paragraph::new(UNAVAILABLE).block(block), area);
        return;
    }

    let bars: Vec<Bar> = snapshot
        .cpu
        .iter()
        .map(|core| {
            Bar::default()
                .value(core.percent as u64)
                .label(Line::from(core.label.clone()))
                .text_value(format!("{:3.0}%", core.percent))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(4)
        .bar_gap(1)
        .max(100);
    frame.render_widget(chart, area);
}

fn render_memory(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let lines: Vec<Line> = match &snapshot.memory {
        Some(mem) => vec![
            Line::from(format!("Used: {}", format_gib(mem.used_gb))),
            Line::from(format!("Free: {}", format_gib(mem.free_gb))),
            Line::from(format!("Total: {}", format_gib(mem.total_gb))),
            Line::from(format!("UsedPercent: {:.2}%", mem.used_percent)),
        ],
        None => vec![Line::from(UNAVAILABLE)],
    };
    frame.render_widget(
        Paragraph::new(lines).block(Block::bordered().title("MEM")),
        area,
    );
}

fn render_battery(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let battery = &snapshot.battery;
    let mut lines = vec![
        Line::from(match battery.level_percent {
            Some(level) => format!("Battery Level: {level:.2}%"),
            None => format!("Battery Level: {UNAVAILABLE}"),
        }),
        Line::from(match battery.cycle_count {
            Some(cycles) => format!("Cycle Count: {cycles}"),
            None => format!("Cycle Count: {UNAVAILABLE}"),
        }),
        Line::from(format!("State: {}", battery.state.label())),
    ];

    if let Some(remaining) = battery.time_remaining {
        let caption = match battery.state {
            ChargeState::Charging => "Time until charged",
            _ => "Battery time left",
        };
        lines.push(Line::from(format!(
            "{caption}: {}",
            format_hours_minutes(remaining)
        )));
    }
    if let Some(watts) = battery.power_draw_w {
        lines.push(Line::from(format!(
            "Current power consumption: {}",
            format_watts(watts)
        )));
    }

    frame.render_widget(
        Paragraph::new(lines).block(Block::bordered().title("Battery")),
        area,
    );
}
