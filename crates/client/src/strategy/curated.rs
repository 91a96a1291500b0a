//! Curated fallback keywords.
//!
//! Generic shopping-category keywords used when live extraction comes up
//! short. Applied in list order.

use async_trait::async_trait;
use shoptrends_core::{Candidate, Error};

use super::{CascadeRun, Strategy};

/// Fallback keywords, in the order they are applied.
pub const CURATED_KEYWORDS: &[&str] = &[
    "노트북", "스마트폰", "에어팟", "갤럭시", "아이폰", "태블릿", "키보드", "마우스", "모니터", "헤드셋", "스피커", "충전기", "케이스",
    "보호필름", "스탠드", "거치대", "노트북가방", "마우스패드", "웹캠", "마이크", "블루투스", "와이파이", "라우터", "외장하드", "USB",
    "메모리카드", "배터리", "파워뱅크", "선풍기", "에어컨", "히터", "공기청정기", "청소기", "로봇청소기", "세탁기", "건조기", "냉장고",
    "전자레인지", "오븐", "토스터", "커피머신", "믹서", "블렌더", "압력솥", "전기밥솥", "후라이팬", "냄비", "도마", "칼", "그릇", "컵",
    "텀블러", "보온병", "도시락", "랩", "비닐", "장갑", "마스크", "손소독제", "티슈", "화장지", "세제", "섬유유연제", "샴푸", "린스",
    "바디워시", "비누", "치약", "칫솔", "수건", "타월", "이불", "베개", "매트리스", "커튼", "카펫", "의자", "책상", "책장", "선반",
    "수납함", "옷걸이", "행거", "거울", "조명", "전구", "스위치", "콘센트", "멀티탭", "전선", "테이프", "가위", "풀", "스테이플러",
    "클립", "포스트잇", "노트", "펜", "연필", "지우개", "자", "계산기", "펀치", "파일", "바인더", "폴더", "파일박스",
];

/// Fills remaining slots from [`CURATED_KEYWORDS`].
pub struct CuratedStrategy {
    keywords: &'static [&'static str],
    category: String,
}

impl CuratedStrategy {
    pub fn new(category: impl Into<String>) -> Self {
        Self { keywords: CURATED_KEYWORDS, category: category.into() }
    }
}

#[async_trait]
impl Strategy for CuratedStrategy {
    fn name(&self) -> &'static str {
        "curated"
    }

    async fn collect(&self, run: &CascadeRun) -> Result<Vec<Candidate>, Error> {
        Ok(self
            .keywords
            .iter()
            .filter(|keyword| !run.contains(keyword))
            .take(run.remaining())
            .map(|keyword| Candidate::keyword(*keyword).with_category(&self.category))
            .collect())
    }
}
