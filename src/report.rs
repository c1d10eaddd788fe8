use std::fmt::Write;

use crate::areas::cores_areas;
use crate::grades::{get_nota_border_color, nota_para_texto};
use crate::markup::render_markdown;
use crate::models::{
    Candidate, Cycle, EvaluationDetail, Exam, ExamDetail, Member, MemberCycleScore, MemberOption,
    ResultDetail, SelectionProcess, ThermometerPoint, ThermometerReading, Trend,
};

pub fn render_home(cycles: &[Cycle], processes: &[SelectionProcess]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Coordenação");
    let _ = writeln!(output);
    let _ = writeln!(output, "## Ciclos recentes");
    if cycles.is_empty() {
        let _ = writeln!(output, "Nenhum ciclo cadastrado.");
    } else {
        for cycle in cycles.iter().take(3) {
            let _ = writeln!(output, "- [{}](/coord/ciclos/{})", cycle.name, cycle.id);
        }
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "## Processos seletivos");
    if processes.is_empty() {
        let _ = writeln!(output, "Nenhum processo seletivo cadastrado.");
    } else {
        for process in processes.iter().take(3) {
            let _ = writeln!(
                output,
                "- [{}](/coord/processo-seletivo/{})",
                process.name, process.id
            );
        }
    }
    output
}

pub fn render_members(members: &[MemberOption]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Membros ativos");
    let _ = writeln!(output);
    if members.is_empty() {
        let _ = writeln!(output, "Nenhum membro ativo.");
        return output;
    }
    for member in members {
        let area = if member.area.is_empty() { "sem área" } else { member.area.as_str() };
        let _ = writeln!(
            output,
            "- {} ({}) {} `{}`",
            member.name,
            member.id,
            area,
            cores_areas(&member.area)
        );
    }
    output
}

pub fn render_cycles(cycles: &[Cycle]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Ciclos de avaliação");
    let _ = writeln!(output);
    if cycles.is_empty() {
        let _ = writeln!(output, "Nenhum ciclo cadastrado.");
        return output;
    }
    for cycle in cycles {
        let _ = writeln!(
            output,
            "- [{}](/coord/ciclos/{}) de {} a {}",
            cycle.name, cycle.id, cycle.starts_on, cycle.ends_on
        );
    }
    output
}

pub fn render_cycle_report(cycle: &Cycle, scores: &[MemberCycleScore]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Ciclo {}", cycle.name);
    let _ = writeln!(output, "De {} a {}", cycle.starts_on, cycle.ends_on);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Membros avaliados");

    if scores.is_empty() {
        let _ = writeln!(output, "Nenhuma avaliação registrada neste ciclo.");
        return output;
    }

    for score in scores {
        let rounded = score.average_nota.round() as i32;
        let _ = writeln!(
            output,
            "- [{}](/coord/ciclos/{}/avaliacoes/{}) ({}) média {:.1}: {} [{}] em {} avaliações{}",
            score.member_name,
            cycle.id,
            score.member_id,
            score.area,
            score.average_nota,
            nota_para_texto(rounded),
            get_nota_border_color(rounded),
            score.evaluation_count,
            if score.has_report { ", com relatório" } else { "" }
        );
    }
    output
}

pub fn render_evaluation(detail: &EvaluationDetail) -> String {
    let mut output = String::new();
    let area = detail.member.area.as_deref().unwrap_or("");
    let _ = writeln!(output, "# {} no ciclo {}", detail.member.name, detail.cycle.name);
    let _ = writeln!(
        output,
        "Área: {} `{}`",
        if area.is_empty() { "sem área" } else { area },
        cores_areas(area)
    );
    if let Some(photo) = &detail.member.photo {
        let _ = writeln!(output, "Foto: {}", photo);
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "## Notas");

    if detail.grades.is_empty() {
        let _ = writeln!(output, "Nenhuma nota registrada.");
    } else {
        for grade in &detail.grades {
            let _ = write!(
                output,
                "- {}: {} ({}) [{}]",
                grade.criterion,
                grade.nota,
                nota_para_texto(grade.nota),
                get_nota_border_color(grade.nota)
            );
            if let Some(comment) = &grade.comment {
                let _ = write!(output, "; {}", comment);
            }
            let _ = writeln!(output);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Relatório");
    match &detail.report {
        Some(summary) => {
            let _ = writeln!(output, "{}", summary);
        }
        None => {
            let _ = writeln!(output, "Relatório ainda não escrito.");
        }
    }
    output
}

pub fn render_thermometer(
    member: &Member,
    points: &[ThermometerPoint],
    reading: Option<&ThermometerReading>,
) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Termômetro de {} (#{})", member.name, member.id);
    if !member.active {
        let _ = writeln!(output, "Membro inativo.");
    }
    let _ = writeln!(output);

    let Some(reading) = reading else {
        let _ = writeln!(output, "Sem avaliações registradas.");
        return output;
    };

    let trend = match reading.trend {
        Trend::Rising => "subindo",
        Trend::Falling => "caindo",
        Trend::Steady => "estável",
    };
    let _ = writeln!(
        output,
        "Leitura ponderada {:.1} [{}], última média {:.1}, tendência {} em {} ciclos",
        reading.weighted_nota, reading.border_color, reading.latest_nota, trend, reading.cycle_count
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Por ciclo");
    for point in points {
        let _ = writeln!(
            output,
            "- [{}](/coord/ciclos/{}) ({}): média {:.1} em {} avaliações",
            point.cycle_name, point.cycle_id, point.starts_on, point.average_nota, point.evaluation_count
        );
    }
    output
}

pub fn render_processes(processes: &[SelectionProcess]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Processos seletivos");
    let _ = writeln!(output);
    if processes.is_empty() {
        let _ = writeln!(output, "Nenhum processo seletivo cadastrado.");
        return output;
    }
    for process in processes {
        let _ = writeln!(
            output,
            "- [{}](/coord/processo-seletivo/{}) ({})",
            process.name, process.id, process.year
        );
    }
    output
}

pub fn render_process(process: &SelectionProcess, candidates: &[Candidate], exams: &[Exam]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# {} ({})", process.name, process.year);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Candidatos");
    if candidates.is_empty() {
        let _ = writeln!(output, "Nenhum candidato inscrito.");
    } else {
        for candidate in candidates {
            let _ = writeln!(
                output,
                "- {} (#{}) <{}> {}",
                candidate.name, candidate.id, candidate.email, candidate.course
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Provas");
    if exams.is_empty() {
        let _ = writeln!(output, "Nenhuma prova cadastrada.");
    } else {
        for exam in exams {
            let _ = writeln!(
                output,
                "- [{}](/coord/processo-seletivo/{}/provas/{})",
                exam.title, process.id, exam.id
            );
        }
    }
    output
}

pub fn render_exam(detail: &ExamDetail) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# {}", detail.exam.title);
    if !detail.exam.instructions.is_empty() {
        let _ = writeln!(output, "{}", render_markdown(&detail.exam.instructions));
    }
    let _ = writeln!(output);

    if detail.questions.is_empty() {
        let _ = writeln!(output, "Prova sem questões.");
        return output;
    }

    for question in &detail.questions {
        let _ = writeln!(
            output,
            "## Questão {} ({:.1} pontos)",
            question.position, question.max_score
        );
        let _ = writeln!(output, "{}", render_markdown(&question.statement));
        let _ = writeln!(output);
    }
    output
}

pub fn render_result(detail: &ResultDetail) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Resultado #{} de {}", detail.id, detail.candidate.name);
    let _ = writeln!(output, "Prova: {}", detail.exam.title);
    let _ = writeln!(output, "Nota: {:.1} de {:.1}", detail.score, detail.max_score);
    if !detail.notes.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "{}", detail.notes);
    }
    output
}
