use anyhow::Context;
use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{
    Area, Candidate, CriterionGrade, Cycle, EvaluationDetail, Exam, ExamDetail, ExamQuestion,
    Member, MemberCycleScore, MemberOption, ResultDetail, SelectionProcess, ThermometerPoint,
};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let areas = ["Presidência", "Projetos", "Comercial", "Marketing", "Gestão de Pessoas"];
    for name in areas {
        upsert_area(pool, name).await?;
    }

    let members = vec![
        ("Ana Souza", "Presidência", Some("ana-souza.jpg"), true),
        ("Bruno Lima", "Projetos", Some("bruno-lima.jpg"), true),
        ("Carla Mendes", "Comercial", None, true),
        ("Diego Rocha", "Marketing", Some("diego-rocha.jpg"), true),
        ("Elisa Prado", "Gestão de Pessoas", None, false),
    ];
    for (name, area, photo, active) in members {
        let area_id = upsert_area(pool, area).await?;
        sqlx::query(
            r#"
            INSERT INTO coord.members (name, photo, active, area_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (name) DO UPDATE
            SET photo = EXCLUDED.photo, active = EXCLUDED.active, area_id = EXCLUDED.area_id
            "#,
        )
        .bind(name)
        .bind(photo)
        .bind(active)
        .bind(area_id)
        .execute(pool)
        .await?;
    }

    let cycles = vec![
        ("2025.2", date(2025, 8, 1)?, date(2025, 12, 15)?),
        ("2026.1", date(2026, 2, 1)?, date(2026, 6, 30)?),
    ];
    for (name, starts_on, ends_on) in cycles {
        upsert_cycle(pool, name, starts_on, ends_on).await?;
    }

    let evaluations = vec![
        ("seed-eval-001", "Ana Souza", "2025.2", "Entrega", 8, Some("Conduziu a virada de gestão")),
        ("seed-eval-002", "Ana Souza", "2025.2", "Postura", 10, None),
        ("seed-eval-003", "Ana Souza", "2026.1", "Entrega", 10, None),
        ("seed-eval-004", "Bruno Lima", "2025.2", "Entrega", 6, Some("Atrasos no projeto piloto")),
        ("seed-eval-005", "Bruno Lima", "2026.1", "Entrega", 4, None),
        ("seed-eval-006", "Carla Mendes", "2026.1", "Postura", 8, None),
        ("seed-eval-007", "Diego Rocha", "2026.1", "Entrega", 6, None),
    ];
    for (source_key, member, cycle, criterion, nota, comment) in evaluations {
        let member_id: i32 = sqlx::query("SELECT id FROM coord.members WHERE name = $1")
            .bind(member)
            .fetch_one(pool)
            .await?
            .get("id");
        let cycle_id: i32 = sqlx::query("SELECT id FROM coord.cycles WHERE name = $1")
            .bind(cycle)
            .fetch_one(pool)
            .await?
            .get("id");

        insert_evaluation(pool, cycle_id, member_id, criterion, nota, comment, source_key).await?;
    }

    sqlx::query(
        r#"
        INSERT INTO coord.reports (cycle_id, member_id, summary)
        SELECT c.id, m.id, 'Evolução consistente, pronta para assumir a diretoria.'
        FROM coord.cycles c, coord.members m
        WHERE c.name = '2026.1' AND m.name = 'Ana Souza'
        ON CONFLICT (cycle_id, member_id) DO NOTHING
        "#,
    )
    .execute(pool)
    .await?;

    let process_id: i32 = sqlx::query(
        r#"
        INSERT INTO coord.selection_processes (name, year)
        VALUES ('Processo Seletivo 2026', 2026)
        ON CONFLICT (name) DO UPDATE SET year = EXCLUDED.year
        RETURNING id
        "#,
    )
    .fetch_one(pool)
    .await?
    .get("id");

    let candidates = vec![
        ("Felipe Araújo", "felipe.araujo@example.com", "Engenharia Civil"),
        ("Gabriela Nunes", "gabriela.nunes@example.com", "Administração"),
    ];
    for (name, email, course) in candidates {
        sqlx::query(
            r#"
            INSERT INTO coord.candidates (process_id, name, email, course)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (process_id, email) DO UPDATE
            SET name = EXCLUDED.name, course = EXCLUDED.course
            "#,
        )
        .bind(process_id)
        .bind(name)
        .bind(email)
        .bind(course)
        .execute(pool)
        .await?;
    }

    let exam_id: i32 = sqlx::query(
        r#"
        INSERT INTO coord.exams (process_id, title, instructions)
        VALUES ($1, 'Prova de Raciocínio Lógico', 'Responda todas as questões com justificativa.')
        ON CONFLICT (process_id, title) DO UPDATE SET instructions = EXCLUDED.instructions
        RETURNING id
        "#,
    )
    .bind(process_id)
    .fetch_one(pool)
    .await?
    .get("id");

    let questions = vec![
        (1, "Se $x + 3 = 7$, quanto vale $x^2$?", 4.0),
        (2, "Calcule a soma $$\\sum_{i=1}^{10} i$$ e explique o método.", 6.0),
    ];
    for (position, statement, max_score) in questions {
        sqlx::query(
            r#"
            INSERT INTO coord.exam_questions (exam_id, position, statement, max_score)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (exam_id, position) DO UPDATE
            SET statement = EXCLUDED.statement, max_score = EXCLUDED.max_score
            "#,
        )
        .bind(exam_id)
        .bind(position)
        .bind(statement)
        .bind(max_score)
        .execute(pool)
        .await?;
    }

    sqlx::query(
        r#"
        INSERT INTO coord.results (exam_id, candidate_id, score, notes)
        SELECT $1, c.id, 8.5, 'Boa argumentação na questão 2'
        FROM coord.candidates c
        WHERE c.process_id = $2 AND c.email = 'felipe.araujo@example.com'
        ON CONFLICT (exam_id, candidate_id) DO NOTHING
        "#,
    )
    .bind(exam_id)
    .bind(process_id)
    .execute(pool)
    .await?;

    Ok(())
}

fn date(year: i32, month: u32, day: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).context("invalid date")
}

async fn upsert_area(pool: &PgPool, name: &str) -> anyhow::Result<i32> {
    let id = sqlx::query(
        r#"
        INSERT INTO coord.areas (name)
        VALUES ($1)
        ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(name)
    .fetch_one(pool)
    .await?
    .get("id");
    Ok(id)
}

async fn upsert_cycle(
    pool: &PgPool,
    name: &str,
    starts_on: NaiveDate,
    ends_on: NaiveDate,
) -> anyhow::Result<i32> {
    let id = sqlx::query(
        r#"
        INSERT INTO coord.cycles (name, starts_on, ends_on)
        VALUES ($1, $2, $3)
        ON CONFLICT (name) DO UPDATE
        SET starts_on = EXCLUDED.starts_on, ends_on = EXCLUDED.ends_on
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(starts_on)
    .bind(ends_on)
    .fetch_one(pool)
    .await?
    .get("id");
    Ok(id)
}

async fn insert_evaluation(
    pool: &PgPool,
    cycle_id: i32,
    member_id: i32,
    criterion: &str,
    nota: i32,
    comment: Option<&str>,
    source_key: &str,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO coord.evaluations
        (cycle_id, member_id, criterion, nota, comment, source_key)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (source_key) DO NOTHING
        "#,
    )
    .bind(cycle_id)
    .bind(member_id)
    .bind(criterion)
    .bind(nota)
    .bind(comment)
    .bind(source_key)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        member: String,
        area: String,
        cycle: String,
        starts_on: NaiveDate,
        ends_on: NaiveDate,
        criterion: String,
        nota: i32,
        comment: Option<String>,
        source_key: Option<String>,
    }

    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut inserted = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        let area_id = upsert_area(pool, &row.area).await?;
        let member_id: i32 = sqlx::query(
            r#"
            INSERT INTO coord.members (name, active, area_id)
            VALUES ($1, TRUE, $2)
            ON CONFLICT (name) DO UPDATE SET area_id = EXCLUDED.area_id
            RETURNING id
            "#,
        )
        .bind(&row.member)
        .bind(area_id)
        .fetch_one(pool)
        .await?
        .get("id");
        let cycle_id = upsert_cycle(pool, &row.cycle, row.starts_on, row.ends_on).await?;

        let source_key = row
            .source_key
            .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));
        let comment = row.comment.filter(|value| !value.trim().is_empty());

        if insert_evaluation(
            pool,
            cycle_id,
            member_id,
            &row.criterion,
            row.nota,
            comment.as_deref(),
            &source_key,
        )
        .await?
        {
            inserted += 1;
        } else {
            tracing::debug!(source_key = %source_key, "evaluation already imported");
        }
    }

    Ok(inserted)
}

pub fn member_option(id: i32, name: String, photo: Option<String>, area: Option<String>) -> MemberOption {
    MemberOption {
        id: id.to_string(),
        name,
        photo,
        area: area.unwrap_or_default(),
    }
}

pub async fn get_active_members(pool: &PgPool) -> anyhow::Result<Vec<MemberOption>> {
    let rows = sqlx::query(
        "SELECT m.id, m.name, m.photo, a.name AS area \
         FROM coord.members m \
         LEFT JOIN coord.areas a ON a.id = m.area_id \
         WHERE m.active \
         ORDER BY m.name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| member_option(row.get("id"), row.get("name"), row.get("photo"), row.get("area")))
        .collect())
}

pub async fn get_areas(pool: &PgPool) -> anyhow::Result<Vec<Area>> {
    let rows = sqlx::query("SELECT id, name FROM coord.areas ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| Area {
            id: row.get("id"),
            name: row.get("name"),
        })
        .collect())
}

fn member_from_row(row: &PgRow) -> Member {
    Member {
        id: row.get("id"),
        name: row.get("name"),
        photo: row.get("photo"),
        active: row.get("active"),
        area: row.get("area"),
    }
}

pub async fn get_member(pool: &PgPool, member_id: i32) -> anyhow::Result<Option<Member>> {
    let row = sqlx::query(
        "SELECT m.id, m.name, m.photo, m.active, a.name AS area \
         FROM coord.members m \
         LEFT JOIN coord.areas a ON a.id = m.area_id \
         WHERE m.id = $1",
    )
    .bind(member_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(member_from_row))
}

fn cycle_from_row(row: &PgRow) -> Cycle {
    Cycle {
        id: row.get("id"),
        name: row.get("name"),
        starts_on: row.get("starts_on"),
        ends_on: row.get("ends_on"),
    }
}

pub async fn get_cycles(pool: &PgPool) -> anyhow::Result<Vec<Cycle>> {
    let rows = sqlx::query(
        "SELECT id, name, starts_on, ends_on FROM coord.cycles ORDER BY starts_on DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(cycle_from_row).collect())
}

pub async fn get_cycle(pool: &PgPool, cycle_id: i32) -> anyhow::Result<Option<Cycle>> {
    let row = sqlx::query("SELECT id, name, starts_on, ends_on FROM coord.cycles WHERE id = $1")
        .bind(cycle_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(cycle_from_row))
}

pub async fn get_cycle_report(pool: &PgPool, cycle_id: i32) -> anyhow::Result<Vec<MemberCycleScore>> {
    let rows = sqlx::query(
        "SELECT m.id AS member_id, m.name AS member_name, COALESCE(a.name, '') AS area, \
         AVG(e.nota)::float8 AS average_nota, COUNT(e.id) AS evaluation_count, \
         EXISTS (SELECT 1 FROM coord.reports r \
                 WHERE r.cycle_id = e.cycle_id AND r.member_id = m.id) AS has_report \
         FROM coord.evaluations e \
         JOIN coord.members m ON m.id = e.member_id \
         LEFT JOIN coord.areas a ON a.id = m.area_id \
         WHERE e.cycle_id = $1 \
         GROUP BY m.id, m.name, a.name, e.cycle_id \
         ORDER BY average_nota DESC, m.name",
    )
    .bind(cycle_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| MemberCycleScore {
            member_id: row.get("member_id"),
            member_name: row.get("member_name"),
            area: row.get("area"),
            average_nota: row.get("average_nota"),
            evaluation_count: row.get("evaluation_count"),
            has_report: row.get("has_report"),
        })
        .collect())
}

pub async fn get_evaluation_detail(
    pool: &PgPool,
    cycle_id: i32,
    member_id: i32,
) -> anyhow::Result<Option<EvaluationDetail>> {
    let Some(member) = get_member(pool, member_id).await? else {
        return Ok(None);
    };
    let Some(cycle) = get_cycle(pool, cycle_id).await? else {
        return Ok(None);
    };

    let grades = sqlx::query(
        "SELECT criterion, nota, comment FROM coord.evaluations \
         WHERE cycle_id = $1 AND member_id = $2 \
         ORDER BY criterion, id",
    )
    .bind(cycle_id)
    .bind(member_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|row| CriterionGrade {
        criterion: row.get("criterion"),
        nota: row.get("nota"),
        comment: row.get("comment"),
    })
    .collect();

    let report: Option<String> = sqlx::query(
        "SELECT summary FROM coord.reports WHERE cycle_id = $1 AND member_id = $2",
    )
    .bind(cycle_id)
    .bind(member_id)
    .fetch_optional(pool)
    .await?
    .map(|row| row.get("summary"));

    Ok(Some(EvaluationDetail {
        member,
        cycle,
        grades,
        report,
    }))
}

pub async fn get_thermometer(pool: &PgPool, member_id: i32) -> anyhow::Result<Vec<ThermometerPoint>> {
    let rows = sqlx::query(
        "SELECT c.id AS cycle_id, c.name AS cycle_name, c.starts_on, \
         AVG(e.nota)::float8 AS average_nota, COUNT(e.id) AS evaluation_count \
         FROM coord.evaluations e \
         JOIN coord.cycles c ON c.id = e.cycle_id \
         WHERE e.member_id = $1 \
         GROUP BY c.id, c.name, c.starts_on \
         ORDER BY c.starts_on",
    )
    .bind(member_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| ThermometerPoint {
            cycle_id: row.get("cycle_id"),
            cycle_name: row.get("cycle_name"),
            starts_on: row.get("starts_on"),
            average_nota: row.get("average_nota"),
            evaluation_count: row.get("evaluation_count"),
        })
        .collect())
}

fn process_from_row(row: &PgRow) -> SelectionProcess {
    SelectionProcess {
        id: row.get("id"),
        name: row.get("name"),
        year: row.get("year"),
    }
}

pub async fn get_processes(pool: &PgPool) -> anyhow::Result<Vec<SelectionProcess>> {
    let rows = sqlx::query(
        "SELECT id, name, year FROM coord.selection_processes ORDER BY year DESC, name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(process_from_row).collect())
}

pub async fn get_process(pool: &PgPool, process_id: i32) -> anyhow::Result<Option<SelectionProcess>> {
    let row = sqlx::query("SELECT id, name, year FROM coord.selection_processes WHERE id = $1")
        .bind(process_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(process_from_row))
}

pub async fn get_candidates(pool: &PgPool, process_id: i32) -> anyhow::Result<Vec<Candidate>> {
    let rows = sqlx::query(
        "SELECT id, name, email, course FROM coord.candidates \
         WHERE process_id = $1 ORDER BY name",
    )
    .bind(process_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| Candidate {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            course: row.get("course"),
        })
        .collect())
}

fn exam_from_row(row: &PgRow) -> Exam {
    Exam {
        id: row.get("id"),
        process_id: row.get("process_id"),
        title: row.get("title"),
        instructions: row.get("instructions"),
    }
}

pub async fn get_exams(pool: &PgPool, process_id: i32) -> anyhow::Result<Vec<Exam>> {
    let rows = sqlx::query(
        "SELECT id, process_id, title, instructions FROM coord.exams \
         WHERE process_id = $1 ORDER BY title",
    )
    .bind(process_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(exam_from_row).collect())
}

pub async fn get_exam(pool: &PgPool, exam_id: i32) -> anyhow::Result<Option<ExamDetail>> {
    let row = sqlx::query(
        "SELECT id, process_id, title, instructions FROM coord.exams WHERE id = $1",
    )
    .bind(exam_id)
    .fetch_optional(pool)
    .await?;
    let Some(exam) = row.as_ref().map(exam_from_row) else {
        return Ok(None);
    };

    let questions = sqlx::query(
        "SELECT position, statement, max_score FROM coord.exam_questions \
         WHERE exam_id = $1 ORDER BY position",
    )
    .bind(exam_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|row| ExamQuestion {
        position: row.get("position"),
        statement: row.get("statement"),
        max_score: row.get("max_score"),
    })
    .collect();

    Ok(Some(ExamDetail { exam, questions }))
}

pub async fn get_result(pool: &PgPool, result_id: i32) -> anyhow::Result<Option<ResultDetail>> {
    let row = sqlx::query(
        "SELECT r.id, r.score, r.notes, \
         x.id AS exam_id, x.process_id, x.title, x.instructions, \
         c.id AS candidate_id, c.name AS candidate_name, c.email, c.course, \
         (SELECT COALESCE(SUM(q.max_score), 0)::float8 FROM coord.exam_questions q \
          WHERE q.exam_id = x.id) AS max_score \
         FROM coord.results r \
         JOIN coord.exams x ON x.id = r.exam_id \
         JOIN coord.candidates c ON c.id = r.candidate_id \
         WHERE r.id = $1",
    )
    .bind(result_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| ResultDetail {
        id: row.get("id"),
        exam: Exam {
            id: row.get("exam_id"),
            process_id: row.get("process_id"),
            title: row.get("title"),
            instructions: row.get("instructions"),
        },
        candidate: Candidate {
            id: row.get("candidate_id"),
            name: row.get("candidate_name"),
            email: row.get("email"),
            course: row.get("course"),
        },
        score: row.get("score"),
        max_score: row.get("max_score"),
        notes: row.get("notes"),
    }))
}
