#![allow(dead_code)]

use serde_json::{json, Value};

pub fn sample_profile() -> Value {
    json!({
        "profile": {
            "name": "Alice Chen",
            "nameZh": "陈爱丽",
            "nameJa": "チェン・アリス",
            "title": "Product Designer",
            "titleZh": "产品设计师",
            "titleJa": "プロダクトデザイナー",
            "avatar": "assets/avatar.png"
        },
        "cartridges": [
            {"id": "d5", "name": "D5 Render", "nameZh": "D5 渲染器", "nameJa": "D5レンダー", "color": "#ff6600"},
            {"id": "kujiale", "name": "Kujiale", "nameZh": "酷家乐", "nameJa": "クジャーレ"}
        ],
        "ui": {
            "tabs": {
                "skills": {"zh": "技能", "en": "Skills", "ja": "スキル"},
                "achievements": {"zh": "成就", "en": "Achievements", "ja": "実績"}
            },
            "projects": {
                "d5Title": {"zh": "D5 渲染器", "en": "D5 Render"}
            },
            "start": {"zh": "开始", "en": "START", "ja": "スタート"},
            "theme": "retro"
        },
        "skills": {
            "productPlanning": {
                "name": {"zh": "产品规划", "en": "Product Planning", "ja": "プロダクト企画"},
                "description": {"zh": "从零到一", "en": "Zero to one", "ja": "ゼロからイチへ"},
                "cooldown": {"zh": "3 回合", "en": "3 turns", "ja": "3ターン"},
                "level": 9
            },
            "dataAI": {
                "name": {"zh": "数据智能", "en": "Data & AI"}
            }
        },
        "achievements": {
            "patents": {"title": {"en": "Patents"}, "count": 4}
        },
        "education": {
            "zju": {
                "period": {"zh": "2015-2019", "en": "2015-2019", "ja": "2015-2019"},
                "school": {"zh": "浙江大学", "en": "Zhejiang University", "ja": "浙江大学"}
            }
        }
    })
}
