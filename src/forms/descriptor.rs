//! Static per-form schemas.
//!
//! Every form is described once, declaratively: its fields, required set,
//! step count, storage keys, and payload formatter. The session and the
//! submission controller are generic over these descriptors, so the three
//! intake forms share one state machine instead of three hand-copied ones.

use super::payload;
use super::value::{Draft, FieldValue};

/// What a field will accept. The UI is expected to only offer valid inputs;
/// the session uses the kind to coerce rather than to report errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// A number within an inclusive range.
    Number { min: f64, max: f64 },
    /// One of a fixed set of options.
    Choice(&'static [&'static str]),
    /// An integer symptom score in `0..=max`, defaulting to 0.
    Score { max: u8 },
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

/// One intake form: identity, storage keys, step count, fields, and the
/// function that turns a draft into the outbound text block.
pub struct FormDescriptor {
    pub name: &'static str,
    /// Key for the persisted draft.
    pub storage_key: &'static str,
    /// Key for the last successful response.
    pub response_key: &'static str,
    pub success_message: &'static str,
    /// Surfaced when required fields are missing at submit time.
    pub missing_message: &'static str,
    pub steps: u32,
    pub fields: &'static [FieldDescriptor],
    pub format: fn(&Draft, &str) -> String,
}

impl FormDescriptor {
    pub fn field(&self, id: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// The draft a fresh session starts from: scores at 0, numbers unset,
    /// everything else empty text.
    pub fn default_draft(&self) -> Draft {
        self.fields
            .iter()
            .map(|f| {
                let value = match f.kind {
                    FieldKind::Number { .. } => FieldValue::Unset,
                    FieldKind::Score { .. } => FieldValue::Number(0.0),
                    _ => FieldValue::Text(String::new()),
                };
                (f.id.to_string(), value)
            })
            .collect()
    }
}

const GENDERS: &[&str] = &["male", "female", "other"];
const MARITAL: &[&str] = &["single", "married", "divorced", "widowed"];

/// 中医问诊表 — single-step questionnaire.
pub static PATIENT: FormDescriptor = FormDescriptor {
    name: "patient",
    storage_key: "patientFormData",
    response_key: "responselocaldata",
    success_message: "信息提交成功！",
    missing_message: "请填写所有必填项",
    steps: 1,
    fields: &[
        FieldDescriptor { id: "name", label: "姓名", kind: FieldKind::Text, required: true },
        FieldDescriptor { id: "age", label: "年龄", kind: FieldKind::Number { min: 0.0, max: 150.0 }, required: true },
        FieldDescriptor { id: "gender", label: "性别", kind: FieldKind::Choice(GENDERS), required: true },
        FieldDescriptor { id: "maritalStatus", label: "婚姻状况", kind: FieldKind::Choice(MARITAL), required: true },
        FieldDescriptor { id: "condition", label: "病情描述", kind: FieldKind::Text, required: true },
        FieldDescriptor { id: "medicalHistory", label: "既往病史", kind: FieldKind::Text, required: false },
        FieldDescriptor { id: "allergies", label: "过敏史", kind: FieldKind::Text, required: false },
    ],
    format: payload::format_patient,
};

const CN_GENDERS: &[&str] = &["男", "女"];
const SLEEP_HOURS: &[&str] = &["少于6小时", "6-7小时", "7-8小时", "8-9小时", "超过9小时"];
const EXERCISE: &[&str] = &["几乎不运动", "偶尔运动", "每周1-2次", "每周3-4次", "每天运动"];
const STRESS: &[&str] = &["很轻松", "一般", "较大", "很大", "极大"];
const DIET: &[&str] = &["偏爱热食", "偏爱凉食", "重口味", "清淡", "均衡"];
const TONGUE_COLOR: &[&str] = &["淡红", "红", "深红", "淡白", "紫红", "不清楚"];
const TONGUE_COATING: &[&str] = &["薄白", "厚白", "薄黄", "厚黄", "无苔", "不清楚"];
const PULSE: &[&str] = &["平和", "浮", "沉", "细", "数", "迟", "不清楚"];

/// 中医体质测试 — four steps: basics, habits, symptom scores, TCM signs.
pub static CONSTITUTION: FormDescriptor = FormDescriptor {
    name: "constitution",
    storage_key: "constitutionTestData",
    response_key: "constitutionTestResponse",
    success_message: "体质测试完成！",
    missing_message: "请填写所有基本信息",
    steps: 4,
    fields: &[
        FieldDescriptor { id: "name", label: "姓名", kind: FieldKind::Text, required: true },
        FieldDescriptor { id: "age", label: "年龄", kind: FieldKind::Number { min: 1.0, max: 120.0 }, required: true },
        FieldDescriptor { id: "gender", label: "性别", kind: FieldKind::Choice(CN_GENDERS), required: true },
        FieldDescriptor { id: "height", label: "身高", kind: FieldKind::Number { min: 100.0, max: 250.0 }, required: true },
        FieldDescriptor { id: "weight", label: "体重", kind: FieldKind::Number { min: 30.0, max: 200.0 }, required: true },
        FieldDescriptor { id: "sleepHours", label: "睡眠时间", kind: FieldKind::Choice(SLEEP_HOURS), required: false },
        FieldDescriptor { id: "exerciseFrequency", label: "运动频率", kind: FieldKind::Choice(EXERCISE), required: false },
        FieldDescriptor { id: "workStress", label: "工作压力", kind: FieldKind::Choice(STRESS), required: false },
        FieldDescriptor { id: "dietPreference", label: "饮食偏好", kind: FieldKind::Choice(DIET), required: false },
        FieldDescriptor { id: "fatigue", label: "疲劳程度", kind: FieldKind::Score { max: 4 }, required: false },
        FieldDescriptor { id: "coldLimbs", label: "手脚冰冷", kind: FieldKind::Score { max: 4 }, required: false },
        FieldDescriptor { id: "heatIntolerance", label: "怕热程度", kind: FieldKind::Score { max: 4 }, required: false },
        FieldDescriptor { id: "coldIntolerance", label: "怕冷程度", kind: FieldKind::Score { max: 4 }, required: false },
        FieldDescriptor { id: "digestion", label: "消化问题", kind: FieldKind::Score { max: 4 }, required: false },
        FieldDescriptor { id: "sleep", label: "睡眠质量", kind: FieldKind::Score { max: 4 }, required: false },
        FieldDescriptor { id: "emotion", label: "情绪状态", kind: FieldKind::Score { max: 4 }, required: false },
        FieldDescriptor { id: "skinCondition", label: "皮肤状况", kind: FieldKind::Score { max: 4 }, required: false },
        FieldDescriptor { id: "breathing", label: "呼吸状况", kind: FieldKind::Score { max: 4 }, required: false },
        FieldDescriptor { id: "tongueColor", label: "舌质颜色", kind: FieldKind::Choice(TONGUE_COLOR), required: false },
        FieldDescriptor { id: "tongueCoating", label: "舌苔情况", kind: FieldKind::Choice(TONGUE_COATING), required: false },
        FieldDescriptor { id: "pulse", label: "脉象", kind: FieldKind::Choice(PULSE), required: false },
        FieldDescriptor { id: "otherSymptoms", label: "其他症状", kind: FieldKind::Text, required: false },
    ],
    format: payload::format_constitution,
};
