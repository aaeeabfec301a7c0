//! Name-list records of military casualties from historical documents.

use crate::error::Result;
use crate::extractor::{Examples, Extractor, ExtractorConfig};
use serde_json::{json, Value};
use std::path::PathBuf;

pub const DESCRIPTION: &str =
    "Military Records Extractor (Extracts military casualty records from historical documents)";

/// Fields of one name-list record, in column order.
pub const FIELDS: [&str; 16] = [
    "Issue",
    "Page",
    "Province",
    "Rank",
    "Surname",
    "Forename",
    "Middle_name",
    "Religion",
    "Marital_status",
    "County",
    "Town",
    "Place",
    "Casualty_type",
    "Date_DD",
    "Date_MMM",
    "Date_YYYY",
];

const DITTO: &str = "Символ \" означает то же значение, что и в ячейке выше.";

pub const EXAMPLE_RECORDS: &str = r#"
Документ 2682, страница 70. Бессарабская губ. Рядовой Иванов Петр Николаевич, православный, женат. Московский уезд, деревня Пушкино. Ранен 15 Мар 1915.

Документ 2682, страница 70. ", Капитан Попов Петр Николаевич, православный, женат. Могилев уезд, с. Тирасполь, Находится, Кафа. 16 Авг 1897.

Документ 2682, страница 70. ", Поручик Сидоров Иван Иванович, православный, холост. Аккерман. уезд, г. Аккерман., Вставлена, Анапа. Убит 20 Авг 1915.

Документ 2682, страница 70. ", Подпоручик Петров Николай, православный, женат. Кишинев. уезд, с. Кишиневь. Пропал без вести 22 Июн 1917.

Документ 2682, страница 70. ", Ефрейтор Миронов, православный, холост. Измаил уезд, с. Измаил, Уйлия Диорм. Убит 3 Май 1916.

Документ 2682, страница 70. ", Унтер-офицер Васильев Алексей Иванович, православный, женат. Тверской уезд, город Ржев, Центр. площадь. Находится 10 Янв 1918.
"#;

pub const EXAMPLE_JSON_OUTPUT: &str = r#"
[
  {
    "Issue": 2682,
    "Page": 70,
    "Province": "Бессарабская",
    "Rank": "Рядовой",
    "Surname": "Иванов",
    "Forename": "Петр",
    "Middle_name": "Николаевич",
    "Religion": "православный",
    "Marital_status": "женат",
    "County": "Московский",
    "Town": "Пушкино",
    "Place": null,
    "Casualty_type": "Ранен",
    "Date_DD": 15,
    "Date_MMM": "Мар",
    "Date_YYYY": 1915
  },
  {
    "Issue": 2682,
    "Page": 70,
    "Province": "Бессарабская",
    "Rank": "Капитан",
    "Surname": "Попов",
    "Forename": "Петр",
    "Middle_name": "Николаевич",
    "Religion": "православный",
    "Marital_status": "женат",
    "County": "Могилев",
    "Town": "Тирасполь",
    "Place": "Находится, Кафа",
    "Casualty_type": null,
    "Date_DD": 16,
    "Date_MMM": "Авг",
    "Date_YYYY": 1897
  },
  {
    "Issue": 2682,
    "Page": 70,
    "Province": "Бессарабская",
    "Rank": "Поручик",
    "Surname": "Сидоров",
    "Forename": "Иван",
    "Middle_name": "Иванович",
    "Religion": "православный",
    "Marital_status": "холост",
    "County": "Аккерман.",
    "Town": "Аккерман.",
    "Place": "Вставлена, Анапа",
    "Casualty_type": "Убит",
    "Date_DD": 20,
    "Date_MMM": "Авг",
    "Date_YYYY": 1915
  },
  {
    "Issue": 2682,
    "Page": 70,
    "Province": "Бессарабская",
    "Rank": "Подпоручик",
    "Surname": "Петров",
    "Forename": "Николай",
    "Middle_name": null,
    "Religion": "православный",
    "Marital_status": "женат",
    "County": "Кишинев.",
    "Town": "Кишиневь",
    "Place": null,
    "Casualty_type": "Пропал без вести",
    "Date_DD": 22,
    "Date_MMM": "Июн",
    "Date_YYYY": 1917
  },
  {
    "Issue": 2682,
    "Page": 70,
    "Province": "Бессарабская",
    "Rank": "Ефрейтор",
    "Surname": "Миронов",
    "Forename": null,
    "Middle_name": null,
    "Religion": "православный",
    "Marital_status": "холост",
    "County": "Измаил",
    "Town": "Измаил",
    "Place": "Уйлия Диорм",
    "Casualty_type": "Убит",
    "Date_DD": 3,
    "Date_MMM": "Май",
    "Date_YYYY": 1916
  },
  {
    "Issue": 2682,
    "Page": 70,
    "Province": "Бессарабская",
    "Rank": "Унтер-офицер",
    "Surname": "Васильев",
    "Forename": "Алексей",
    "Middle_name": "Иванович",
    "Religion": "православный",
    "Marital_status": "женат",
    "County": "Тверской",
    "Town": "Ржев",
    "Place": "Центр. площадь",
    "Casualty_type": "Находится",
    "Date_DD": 10,
    "Date_MMM": "Янв",
    "Date_YYYY": 1918
  }
]
"#;

fn described(text: &str) -> String {
    format!("{} {}", text, DITTO)
}

/// JSON Schema (draft-07) for one name-list record.
pub fn schema() -> Value {
    let required: Vec<&str> = FIELDS
        .iter()
        .copied()
        .filter(|field| *field != "Middle_name")
        .collect();

    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": "Запись именного списка",
        "type": "object",
        "properties": {
            "Issue": {
                "type": "integer",
                "description": described("Номер списка или документа.")
            },
            "Page": {
                "type": "integer",
                "description": described("Номер страницы, где запись документирована.")
            },
            "Province": {
                "type": "string",
                "description": described("Губерния или провинция."),
                "pattern": "^[А-Яа-яЁё\\s-]+$"
            },
            "Rank": {
                "type": "string",
                "description": described("Должность, звание или статус лица на момент записи."),
                "pattern": "^[А-Яа-яЁё\\s.-]+$"
            },
            "Surname": {
                "type": "string",
                "description": described("Фамилия лица."),
                "pattern": "^[А-Яа-яЁё\\s-]+$"
            },
            "Forename": {
                "type": "string",
                "description": described("Имя лица."),
                "pattern": "^[А-Яа-яЁё\\s-]+$"
            },
            "Middle_name": {
                "type": "string",
                "description": format!("{} Может быть null.", described("Отчество лица, если применимо.")),
                "nullable": true,
                "pattern": "^[А-Яа-яЁё\\s-]*$"
            },
            "Religion": {
                "type": "string",
                "description": described("Религиозная принадлежность лица."),
                "pattern": "^[А-Яа-яЁё\\s.-]+$"
            },
            "Marital_status": {
                "type": "string",
                "description": described("Семейное положение лица на момент записи."),
                "pattern": "^[А-Яа-яЁё\\s.-]+$"
            },
            "County": {
                "type": "string",
                "description": described("Уезд или район."),
                "pattern": "^[А-Яа-яЁё\\s-]+$"
            },
            "Town": {
                "type": "string",
                "description": described("Населенный пункт происхождения лица."),
                "pattern": "^[А-Яа-яЁё\\s.-]+$"
            },
            "Place": {
                "type": "string",
                "description": described("Дополнительная информация о месте, если применимо."),
                "pattern": "^[А-Яа-яЁё\\s.-]+$"
            },
            "Casualty_type": {
                "type": "string",
                "description": described("Тип статуса или события (например, назначен, уволен, находится)."),
                "pattern": "^[А-Яа-яЁё\\s.-]+$"
            },
            "Date_DD": {
                "type": "integer",
                "description": described("День события или назначения."),
                "minimum": 1,
                "maximum": 31,
                "nullable": true
            },
            "Date_MMM": {
                "type": "string",
                "description": described("Месяц события в сокращенной форме (например, 'Янв', 'Фев')."),
                "pattern": "^(Янв|Фев|Мар|Апр|Май|Июн|Июл|Авг|Сен|Окт|Ноя|Дек)$",
                "nullable": true
            },
            "Date_YYYY": {
                "type": "integer",
                "description": described("Год события или назначения."),
                "minimum": 1800,
                "maximum": 1950,
                "nullable": true
            }
        },
        "required": required,
        "additionalProperties": false
    })
}

pub fn config() -> ExtractorConfig {
    ExtractorConfig {
        schema: schema(),
        examples: Examples {
            example_records: EXAMPLE_RECORDS.to_string(),
            example_json_output: EXAMPLE_JSON_OUTPUT.to_string(),
        },
        description: DESCRIPTION.to_string(),
    }
}

/// Extractor for military casualty name lists writing into `output_dir`.
pub fn extractor<P: Into<PathBuf>>(output_dir: P) -> Result<Extractor> {
    Extractor::new(output_dir, config())
}
