use crate::story_entry::StoryEntry;

/// Stories that ship with the stories page. They are shown alongside saved
/// ones and filtered the same way, but they never live in the store.
pub fn featured_stories() -> Vec<StoryEntry> {
    vec![
        featured(
            "Мария Соколова",
            "1",
            "software",
            "Первые шаги в программировании",
            "Я пришла на первый курс, почти ничего не зная о коде. \
             Через полгода мы с командой уже сдавали свой первый проект.",
            "15.12.2023",
        ),
        featured(
            "Алексей Петров",
            "3",
            "ai",
            "Как я попал в лабораторию",
            "На третьем курсе научный руководитель предложил задачу \
             по распознаванию речи. Теперь это тема моей курсовой.",
            "02.02.2024",
        ),
        featured(
            "Дмитрий Ким",
            "graduate",
            "security",
            "От CTF до работы мечты",
            "Студенческие соревнования по информационной безопасности \
             привели меня на стажировку, а потом и на первую работу.",
            "20.06.2024",
        ),
    ]
}

fn featured(
    name: &str,
    course: &str,
    department: &str,
    title: &str,
    text: &str,
    date: &str,
) -> StoryEntry {
    StoryEntry {
        id: 0,
        date: date.to_string(),
        name: name.to_string(),
        course: course.to_string(),
        department: department.to_string(),
        title: title.to_string(),
        text: text.to_string(),
        email: String::new(),
    }
}
