use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Doctor {
    pub id: i64,
    pub user_id: i64,
    pub uuid: Uuid,
    pub name: String,
    pub email: String,
    pub mobile_phone: String,
    pub specialty: String,
}
