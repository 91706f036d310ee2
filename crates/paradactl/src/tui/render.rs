//! UI drawing functions.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use parada_common::format::{format_date_time, format_duration_short, format_minutes};
use parada_common::reason::color_for;

use crate::forms::{AuthMode, RecoveryStep};

use super::app::{App, AuthField, Overlay};

const ACCENT: Color = Color::Cyan;

pub fn draw(f: &mut Frame, app: &App) {
    if app.session.logged_in() {
        draw_dashboard(f, app);
    } else {
        draw_auth(f, app);
    }

    match &app.overlay {
        Some(Overlay::StopForm(form)) => draw_stop_form(f, form),
        Some(Overlay::Recovery(form)) => draw_recovery(f, form),
        None => {}
    }
}

// ---------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------

fn draw_dashboard(f: &mut Frame, app: &App) {
    let error_height = if app.state.last_error.is_some() { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),            // Header
            Constraint::Length(error_height), // Fetch error, if any
            Constraint::Length(5),            // Cards
            Constraint::Min(8),               // Charts
            Constraint::Length(10),           // History
            Constraint::Length(3),            // Footer
        ])
        .split(f.size());

    draw_header(f, chunks[0], app);

    if let Some(error) = &app.state.last_error {
        let line = Paragraph::new(format!("Erro ao buscar dados: {}", error))
            .style(Style::default().fg(Color::LightRed))
            .alignment(Alignment::Center);
        f.render_widget(line, chunks[1]);
    }

    draw_cards(f, chunks[2], app);

    let chart_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[3]);
    draw_pie(f, chart_chunks[0], app);
    draw_bar(f, chart_chunks[1], app);

    draw_history(f, chunks[4], app);
    draw_footer(f, chunks[5], app.poll_secs);
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let now = chrono::Local::now();
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " Indústria Maroni ",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled("Monitoramento I4.0", Style::default().fg(Color::Gray)),
        Span::raw("  │  "),
        Span::styled(app.state.machine(), Style::default().fg(Color::Gray)),
        Span::raw("  │  "),
        Span::styled(
            format!("Logado como: {}", app.session.display_name()),
            Style::default().fg(Color::Gray),
        ),
        Span::raw("  │  "),
        Span::styled(
            now.format("%d/%m/%Y %H:%M:%S").to_string(),
            Style::default().fg(Color::Gray),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT)),
    );
    f.render_widget(header, area);
}

fn draw_cards(f: &mut Frame, area: Rect, app: &App) {
    let summary = app.state.summary();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(34),
            Constraint::Percentage(33),
        ])
        .split(area);

    let cards = [
        (" Total de Paradas ", summary.total_stops().to_string()),
        (" Tempo Total ", format_minutes(summary.total_minutes())),
        (" Motivo Mais Comum ", summary.top_reason().to_string()),
    ];

    for ((title, value), chunk) in cards.iter().zip(chunks.iter()) {
        let card = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                value.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title(*title),
        );
        f.render_widget(card, *chunk);
    }
}

fn draw_pie(f: &mut Frame, area: Rect, app: &App) {
    let slices = app.state.pie();

    let mut lines: Vec<Line> = Vec::new();
    match app.state.filter_reason() {
        Some(filter) => lines.push(Line::from(Span::styled(
            format!("Filtro: {}  (c = Limpar Filtro)", filter),
            Style::default().fg(ACCENT),
        ))),
        None => lines.push(Line::from(Span::styled(
            "Enter filtra pelo motivo selecionado",
            Style::default().fg(Color::DarkGray),
        ))),
    }
    lines.push(Line::from(""));

    if slices.is_empty() {
        lines.push(Line::from(Span::styled(
            "Sem dados",
            Style::default().fg(Color::Gray),
        )));
    }

    for (i, slice) in slices.iter().enumerate() {
        let marker = if i == app.selected_slice { "▶ " } else { "  " };
        let style = if i == app.selected_slice {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(marker.to_string(), style),
            Span::styled("■ ", Style::default().fg(slice.color)),
            Span::styled(format!("{:<22}", slice.label), style),
            Span::styled(format!("{:>5}", slice.value), style),
        ]));
    }

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Distribuição de Motivos "),
        );
    f.render_widget(panel, area);
}

fn draw_bar(f: &mut Frame, area: Rect, app: &App) {
    let series = app.state.bar();
    let data: Vec<(String, u64)> = series
        .labels
        .iter()
        .zip(series.data.iter())
        .map(|(label, value)| (label.clone(), value.round().max(0.0) as u64))
        .collect();
    let refs: Vec<(&str, u64)> = data.iter().map(|(l, v)| (l.as_str(), *v)).collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Tempo - Últimas Paradas (min) "),
        )
        .bar_width(9)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::LightBlue))
        .value_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
        )
        .data(&refs);
    f.render_widget(chart, area);
}

fn draw_history(f: &mut Frame, area: Rect, app: &App) {
    let rows_data = app.state.history_rows();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Últimas Paradas ");

    if rows_data.is_empty() {
        let empty = Paragraph::new("Nenhuma parada registrada ainda.")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec!["Máquina", "Motivo", "Início", "Fim", "Duração"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = rows_data
        .iter()
        .map(|r| {
            let reason = r.reason.as_deref().unwrap_or("—");
            let start = r
                .start_local()
                .map(|t| format_date_time(&t))
                .unwrap_or_else(|| "--".to_string());
            let end = r
                .end_time
                .map(|t| format_date_time(&t.with_timezone(&chrono::Local)))
                .unwrap_or_else(|| "—".to_string());
            Row::new(vec![
                Cell::from(r.machine.as_deref().unwrap_or("—").to_string()),
                Cell::from(reason.to_string())
                    .style(Style::default().fg(color_for(r.reason.as_deref()))),
                Cell::from(start),
                Cell::from(end),
                Cell::from(format_duration_short(r.duration_min())),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Length(20),
            Constraint::Length(20),
            Constraint::Length(20),
            Constraint::Min(8),
        ],
    )
    .header(header)
    .column_spacing(1)
    .block(block);

    f.render_widget(table, area);
}

/// Footer note showing the configured refresh cadence.
fn refresh_note(poll_secs: u64) -> String {
    format!("Atualização automática: {}s", poll_secs)
}

fn draw_footer(f: &mut Frame, area: Rect, poll_secs: u64) {
    let poll_note = refresh_note(poll_secs);
    let footer = Paragraph::new(Line::from(vec![
        key_hint(" r "),
        Span::raw(" Registrar Parada  "),
        key_hint(" ↑/↓ "),
        Span::raw(" Motivo  "),
        key_hint(" Enter "),
        Span::raw(" Filtrar  "),
        key_hint(" c "),
        Span::raw(" Limpar Filtro  "),
        key_hint(" F5 "),
        Span::raw(" Atualizar  "),
        key_hint(" l "),
        Span::raw(" Sair  "),
        key_hint(" q "),
        Span::raw(" Fechar  "),
        Span::styled(
            format!("│ {}", poll_note),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray)),
    );
    f.render_widget(footer, area);
}

fn key_hint(text: &str) -> Span<'_> {
    Span::styled(text, Style::default().fg(Color::Black).bg(Color::Gray))
}

// ---------------------------------------------------------------
// Login / registration
// ---------------------------------------------------------------

fn draw_auth(f: &mut Frame, app: &App) {
    let area = centered_rect(46, 18, f.size());
    f.render_widget(Clear, area);

    let title = match app.auth.mode {
        AuthMode::Login => " Maroni - Entrar ",
        AuthMode::Register => " Maroni - Cadastrar ",
    };

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "Indústria Maroni",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Monitoramento I4.0",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];

    for field in app.auth_fields() {
        lines.push(auth_field_line(app, field));
    }

    lines.push(Line::from(""));
    if let Some(error) = &app.auth.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::LightRed),
        )));
    } else if app.auth.submitting {
        lines.push(Line::from(Span::styled(
            "Processando...",
            Style::default().fg(Color::Gray),
        )));
    } else {
        lines.push(Line::from(""));
    }

    let hints = match app.auth.mode {
        AuthMode::Login => "Enter Entrar · F2 Cadastrar novo usuário · F3 Esqueci minha senha",
        AuthMode::Register => "Enter Cadastrar · F2 Já tenho uma conta",
    };
    lines.push(Line::from(Span::styled(
        hints,
        Style::default().fg(Color::DarkGray),
    )));

    let card = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ACCENT))
                .title(title),
        );
    f.render_widget(card, area);
}

fn auth_field_line(app: &App, field: AuthField) -> Line<'static> {
    let (label, value, masked) = match field {
        AuthField::FullName => ("Nome Completo", &app.auth.full_name, false),
        AuthField::Username => ("Usuário", &app.auth.username, false),
        AuthField::Email => ("E-mail", &app.auth.email, false),
        AuthField::Password => ("Senha", &app.auth.password, true),
        AuthField::ConfirmPassword => ("Confirmar Senha", &app.auth.confirm_password, true),
    };
    field_line(label, value, masked, app.auth_focus == field)
}

fn field_line(label: &str, value: &str, masked: bool, focused: bool) -> Line<'static> {
    let shown = if masked {
        "*".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let cursor = if focused { "_" } else { "" };
    let style = if focused {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(format!("{}: ", label), style),
        Span::raw(shown),
        Span::styled(cursor.to_string(), style),
    ])
}

// ---------------------------------------------------------------
// Overlays
// ---------------------------------------------------------------

fn draw_stop_form(f: &mut Frame, form: &crate::forms::StopForm) {
    let area = centered_rect(40, 10, f.size());
    f.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(vec![
            Span::raw("Motivo da Parada:  "),
            Span::styled("◀ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                form.reason(),
                Style::default()
                    .fg(color_for(Some(form.reason())))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ▶", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(vec![
            Span::raw("Duração (minutos): "),
            Span::raw(form.duration.clone()),
            Span::styled("_", Style::default().fg(ACCENT)),
        ]),
        Line::from(Span::styled(
            "Ex: 30.5",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::LightRed),
        )));
    } else if form.submitting {
        lines.push(Line::from(Span::styled(
            "Registrando...",
            Style::default().fg(Color::Gray),
        )));
    } else {
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "Enter Registrar · Esc Cancelar",
        Style::default().fg(Color::DarkGray),
    )));

    let modal = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT))
            .title(" Registrar Nova Parada "),
    );
    f.render_widget(modal, area);
}

fn draw_recovery(f: &mut Frame, form: &crate::forms::RecoveryForm) {
    let area = centered_rect(44, 12, f.size());
    f.render_widget(Clear, area);

    let mut lines: Vec<Line> = Vec::new();

    if let Some(message) = &form.message {
        lines.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Green),
        )));
        lines.push(Line::from(""));
    }

    match form.step {
        RecoveryStep::Email => {
            lines.push(field_line("Email", &form.email, false, true));
        }
        RecoveryStep::Code => {
            lines.push(field_line("Código de Verificação", &form.code, false, true));
        }
        RecoveryStep::NewPassword => {
            lines.push(field_line(
                "Nova Senha",
                &form.new_password,
                true,
                !form.confirm_focus,
            ));
            lines.push(field_line(
                "Confirmar Nova Senha",
                &form.confirm_password,
                true,
                form.confirm_focus,
            ));
        }
    }

    lines.push(Line::from(""));
    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::LightRed),
        )));
    } else if form.submitting {
        lines.push(Line::from(Span::styled(
            "Processando...",
            Style::default().fg(Color::Gray),
        )));
    } else {
        lines.push(Line::from(""));
    }

    let hints = if form.step == RecoveryStep::NewPassword {
        "Enter Confirmar · Tab Alternar campo · Esc Fechar"
    } else {
        "Enter Confirmar · Esc Fechar"
    };
    lines.push(Line::from(Span::styled(
        hints,
        Style::default().fg(Color::DarkGray),
    )));

    let modal = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT))
            .title(" Recuperação de Senha "),
    );
    f.render_widget(modal, area);
}

/// Centered rect of fixed size, clamped to the frame.
fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}
