use crate::inspection::domain::ChecklistItem;

#[derive(Debug)]
pub(crate) struct SubGroup<'a> {
    pub name: Option<&'a str>,
    pub items: Vec<&'a ChecklistItem>,
}

#[derive(Debug)]
pub(crate) struct CategoryGroup<'a> {
    pub name: Option<&'a str>,
    pub subgroups: Vec<SubGroup<'a>>,
}

/// Group items by category, then subcategory, keeping first-seen order.
pub(crate) fn group_items(items: &[ChecklistItem]) -> Vec<CategoryGroup<'_>> {
    let mut groups: Vec<CategoryGroup<'_>> = Vec::new();

    for item in items {
        let category = item.category.as_deref();
        let position = match groups.iter().position(|group| group.name == category) {
            Some(position) => position,
            None => {
                groups.push(CategoryGroup {
                    name: category,
                    subgroups: Vec::new(),
                });
                groups.len() - 1
            }
        };

        let subgroups = &mut groups[position].subgroups;
        let subcategory = item.subcategory.as_deref();
        match subgroups.iter_mut().find(|sub| sub.name == subcategory) {
            Some(sub) => sub.items.push(item),
            None => subgroups.push(SubGroup {
                name: subcategory,
                items: vec![item],
            }),
        }
    }

    groups
}
