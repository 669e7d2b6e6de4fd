/// Terminal mount for the chat widget
///
/// Renders one widget instance per the current view state: launcher
/// bubble, minimized bubble, peer directory, or conversation.
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Terminal,
};

use sidechat_core::directory::load_peers;
use sidechat_core::dispatch::DeliveryDispatcher;
use sidechat_core::widget::{SessionUser, WidgetView};
use sidechat_core::{ApiClient, ChatWidget, Config};

/// Which sub-view is receiving keys; derived before mutating the widget
enum Mode {
    Launcher,
    Minimized,
    Directory,
    Conversation,
}

fn mode(widget: &ChatWidget) -> Mode {
    match widget.view() {
        WidgetView::Hidden | WidgetView::Launcher => Mode::Launcher,
        WidgetView::Minimized => Mode::Minimized,
        WidgetView::Directory { .. } => Mode::Directory,
        WidgetView::Conversation { .. } => Mode::Conversation,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = Config::from_args(&args).map_err(|e| anyhow::anyhow!("{}", e))?;

    let client = ApiClient::new(config.api_url.clone(), config.request_timeout)
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    // One directory fetch per mount; failure collapses to an empty list
    let peers = load_peers(&client).await;

    let session = SessionUser::new(config.user_id.clone(), config.username.clone());
    let mut widget = ChatWidget::new(session, DeliveryDispatcher::spawn(client));
    widget.set_peers(peers);

    // TUI setup
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let res = run_app(&mut terminal, &mut widget);
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = res {
        eprintln!("TUI error: {e}");
    }
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    widget: &mut ChatWidget,
) -> std::io::Result<()> {
    let mut cursor: usize = 0;

    loop {
        terminal.draw(|f| draw(f, widget, cursor))?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        // Ctrl+C quits from any view
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(());
        }

        match mode(widget) {
            Mode::Launcher => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Char('t') | KeyCode::Enter => widget.toggle(),
                _ => {}
            },
            Mode::Minimized => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Char('t') => widget.toggle(),
                KeyCode::Char('x') | KeyCode::Esc => widget.close(),
                _ => {}
            },
            Mode::Directory => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Char('t') => widget.toggle(),
                KeyCode::Char('x') | KeyCode::Esc => widget.close(),
                KeyCode::Up => cursor = cursor.saturating_sub(1),
                KeyCode::Down => {
                    if cursor + 1 < widget.peers().len() {
                        cursor += 1;
                    }
                }
                KeyCode::Enter => {
                    if let Some(peer) = widget.peers().get(cursor).cloned() {
                        widget.select(peer);
                    }
                }
                _ => {}
            },
            Mode::Conversation => match key.code {
                KeyCode::Esc => widget.deselect(),
                KeyCode::Enter => widget.submit(),
                KeyCode::Backspace => widget.pop_draft_char(),
                KeyCode::Char(c) => widget.push_draft_char(c),
                _ => {}
            },
        }

        cursor = cursor.min(widget.peers().len().saturating_sub(1));
    }
}

fn draw(f: &mut ratatui::Frame, widget: &ChatWidget, cursor: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.size());

    let hint = match widget.view() {
        WidgetView::Hidden => " Widget disabled: no user session ",
        WidgetView::Launcher => " t open chat | q quit ",
        WidgetView::Minimized => " t expand | x close | q quit ",
        WidgetView::Directory { .. } => " ↑/↓ move | Enter open chat | t minimize | x close | q quit ",
        WidgetView::Conversation { .. } => " type a message | Enter send | Esc back | Ctrl+C quit ",
    };

    match widget.view() {
        WidgetView::Hidden => {
            let para = Paragraph::new("Chat unavailable")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(para, chunks[0]);
        }
        WidgetView::Launcher => {
            let para = Paragraph::new("💬  Chat")
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(para, chunks[0]);
        }
        WidgetView::Minimized => {
            let para = Paragraph::new("💬  Chat (minimized)")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(para, chunks[0]);
        }
        WidgetView::Directory { peers } => {
            if peers.is_empty() {
                let para = Paragraph::new("No users available")
                    .style(Style::default().fg(Color::DarkGray))
                    .block(Block::default().title(" Chats ").borders(Borders::ALL));
                f.render_widget(para, chunks[0]);
            } else {
                let items: Vec<ListItem> = peers
                    .iter()
                    .map(|p| {
                        ListItem::new(Line::from(vec![
                            Span::styled(
                                format!(" ({}) ", p.avatar_initial()),
                                Style::default().fg(Color::Cyan),
                            ),
                            Span::raw(p.username.clone()),
                        ]))
                    })
                    .collect();
                let mut state = ListState::default();
                state.select(Some(cursor.min(peers.len() - 1)));
                let list = List::new(items)
                    .block(Block::default().title(" Chats ").borders(Borders::ALL))
                    .highlight_style(
                        Style::default()
                            .bg(Color::Cyan)
                            .fg(Color::Black)
                            .add_modifier(Modifier::BOLD),
                    );
                f.render_stateful_widget(list, chunks[0], &mut state);
            }
        }
        WidgetView::Conversation { peer, transcript } => {
            let convo_chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
                .split(chunks[0]);

            let lines: Vec<Line> = transcript
                .iter()
                .map(|entry| {
                    Line::from(vec![
                        Span::styled(
                            format!("{}: ", entry.author),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(entry.body.clone()),
                    ])
                })
                .collect();
            let history = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
                Block::default()
                    .title(format!(" {} ", peer.username))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            );
            f.render_widget(history, convo_chunks[0]);

            let input = Paragraph::new(format!("{}▏", widget.draft()))
                .block(Block::default().title(" Message ").borders(Borders::ALL));
            f.render_widget(input, convo_chunks[1]);
        }
    }

    let info = Paragraph::new(hint)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(info, chunks[1]);
}
